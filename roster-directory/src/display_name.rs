use crate::UserId;

/// A display name split into the person's name and an optional
/// organisation domain, e.g. `"Jean Martin [Modernisation]"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayName {
    pub name: String,
    pub domain: Option<String>,
}

impl DisplayName {
    pub fn parse(display_name: &str) -> Self {
        match display_name.split_once('[') {
            Some((name, domain)) => Self {
                name: name.trim().to_string(),
                domain: Some(domain.replace(']', "")),
            },
            None => Self {
                name: display_name.to_string(),
                domain: None,
            },
        }
    }

    /// Builds a readable name out of a user id when the directory did not
    /// provide one: `@jean.martin-modernisation.fr:host` gives `Jean Martin`.
    pub fn from_user_id(user_id: &UserId) -> Self {
        let localpart = user_id.localpart();
        let name_part = match localpart.rfind('-') {
            Some(index) => &localpart[..index],
            None => localpart,
        };
        let name = name_part
            .split('.')
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ");
        Self { name, domain: None }
    }
}

fn capitalize(word: &str) -> String {
    // Hyphenated first names keep each part capitalized: "jean-philippe".
    word.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

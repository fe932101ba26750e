//! `${name}` placeholder substitution.
//!
//! A placeholder is `${`, optional whitespace, a name without whitespace or
//! `}`, optional whitespace and `}`. Names match data keys exactly. A
//! placeholder whose name has no entry in the data is kept verbatim, while
//! falsy-looking values such as `"0"` or `""` are substituted like any other.

use crate::element::{Fragment, PlaceholderData, PlaceholderValue, Translated};

const OPEN: &str = "${";
const CLOSE: char = '}';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Portion<'a> {
    Literal(&'a str),
    Placeholder { token: &'a str, name: &'a str },
}

fn portions(text: &str) -> Vec<Portion<'_>> {
    let mut portions = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(OPEN) {
        let open = cursor + offset;
        let body_start = open + OPEN.len();
        let Some(close_offset) = text[body_start..].find(CLOSE) else {
            break;
        };
        let close = body_start + close_offset;
        let name = text[body_start..close].trim();

        if name.is_empty() || name.contains(char::is_whitespace) {
            cursor = body_start;
            continue;
        }

        if literal_start < open {
            portions.push(Portion::Literal(&text[literal_start..open]));
        }
        portions.push(Portion::Placeholder {
            token: &text[open..=close],
            name,
        });
        cursor = close + 1;
        literal_start = cursor;
    }

    if literal_start < text.len() {
        portions.push(Portion::Literal(&text[literal_start..]));
    }
    portions
}

/// Names of every placeholder in `text`, in order of appearance.
pub fn placeholder_names(text: &str) -> impl Iterator<Item = &str> {
    portions(text).into_iter().filter_map(|portion| match portion {
        Portion::Placeholder { name, .. } => Some(name),
        Portion::Literal(_) => None,
    })
}

/// True when some `${` is never closed by a `}`.
pub fn has_unterminated_placeholder(text: &str) -> bool {
    text.match_indices(OPEN)
        .any(|(index, _)| !text[index + OPEN.len()..].contains(CLOSE))
}

/// Substitutes placeholders in `text` with values from `data`.
///
/// Returns [`Translated::Fragments`] when at least one substituted value is
/// an element, [`Translated::Text`] otherwise.
pub fn templater(text: &str, data: &PlaceholderData) -> Translated {
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut has_element = false;

    for portion in portions(text) {
        match portion {
            Portion::Literal(literal) => push_text(&mut fragments, literal),
            Portion::Placeholder { token, name } => match data.get(name) {
                Some(PlaceholderValue::Text(value)) => push_text(&mut fragments, value),
                Some(PlaceholderValue::Element(element)) => {
                    has_element = true;
                    fragments.push(Fragment::Element(element.clone()));
                },
                None => push_text(&mut fragments, token),
            },
        }
    }

    if has_element {
        return Translated::Fragments(fragments);
    }

    let text = fragments
        .into_iter()
        .map(|fragment| match fragment {
            Fragment::Text(text) => text,
            Fragment::Element(_) => String::new(),
        })
        .collect();
    Translated::Text(text)
}

fn push_text(fragments: &mut Vec<Fragment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Fragment::Text(last)) = fragments.last_mut() {
        last.push_str(text);
    } else {
        fragments.push(Fragment::Text(text.to_string()));
    }
}

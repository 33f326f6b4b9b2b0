use crate::display::Controls;
use crate::listing::Listing;
use crate::session::{PageRequest, Step};

const PREFIX: &str = "votes";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Previous,
    Next,
    Pick,
}

impl NavAction {
    fn code(&self) -> &'static str {
        match self {
            NavAction::Previous => "prev",
            NavAction::Next => "next",
            NavAction::Pick => "pick",
        }
    }
}

// Format: votes:<action>:<page_size>:<page_index>:<listing>
// The listing goes last so a tag can never shift the other parts.
pub fn custom_id(action: NavAction, controls: &Controls) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        PREFIX,
        action.code(),
        controls.page_size,
        controls.page_index,
        controls.listing.encode()
    )
}

// `values` carries the dropdown selection for `pick` ids
pub fn parse(custom_id: &str, values: &[String]) -> Option<PageRequest> {
    let parts: Vec<&str> = custom_id.splitn(5, ':').collect();
    if parts.len() != 5 || parts[0] != PREFIX {
        return None;
    }

    let page_size = parts[2].parse::<usize>().ok().filter(|size| *size > 0)?;
    let page_index = parts[3].parse::<usize>().ok()?;
    let listing = Listing::decode(parts[4])?;
    let step = match parts[1] {
        "prev" => Step::Previous,
        "next" => Step::Next,
        "pick" => Step::Select(values.first()?.clone()),
        _ => return None,
    };

    Some(PageRequest {
        listing,
        page_size,
        page_index,
        step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(listing: Listing) -> Controls {
        Controls {
            listing,
            page_size: 3,
            page_index: 2,
            previous_enabled: true,
            next_enabled: false,
            choices: Vec::new(),
        }
    }

    #[test]
    fn button_ids_carry_the_page_position() {
        let listing = Listing::Polls {
            finished: false,
            tag: Some("risk-parameter".to_string()),
        };
        let id = custom_id(NavAction::Next, &controls(listing.clone()));

        assert_eq!(id, "votes:next:3:2:polls-active/risk-parameter");
        assert_eq!(
            parse(&id, &[]),
            Some(PageRequest {
                listing,
                page_size: 3,
                page_index: 2,
                step: Step::Next,
            })
        );
    }

    #[test]
    fn dropdown_ids_take_the_selected_vote() {
        let id = custom_id(NavAction::Pick, &controls(Listing::Executives));
        let request = parse(&id, &["0xabc".to_string()]).unwrap();
        assert_eq!(request.step, Step::Select("0xabc".to_string()));
        assert_eq!(parse(&id, &[]), None);
    }

    #[test]
    fn foreign_or_broken_ids_are_ignored() {
        assert_eq!(parse("vote_button", &[]), None);
        assert_eq!(parse("votes:next:0:1:active", &[]), None);
        assert_eq!(parse("votes:jump:3:1:active", &[]), None);
        assert_eq!(parse("votes:next:3:x:active", &[]), None);
    }
}

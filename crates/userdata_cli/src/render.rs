//! Plain-text screens.

use userdata_core::{FormField, FormState, RecordsState, UiState};

const EMPTY_PLACEHOLDER: &str = "No user records available yet.";

pub fn render_records(state: &RecordsState) -> String {
    match state {
        UiState::Loading => "Loading...\n".to_string(),
        UiState::Empty => format!("{EMPTY_PLACEHOLDER}\n"),
        UiState::Success(items) => items
            .iter()
            .map(|item| {
                let mut card = item.display_lines().join("\n  ");
                card.insert_str(0, "- ");
                card.push('\n');
                card
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Entry form with an error line under every invalid field.
pub fn render_form(form: &FormState) -> String {
    let mut out = String::new();
    for field in FormField::ALL {
        out.push_str(&format!("{}: {}\n", field_label(field), form.text(field)));
        if let Some(error) = form.error(field) {
            out.push_str(&format!("  ! {error}\n"));
        }
    }
    out
}

fn field_label(field: FormField) -> &'static str {
    match field {
        FormField::Name => "Name",
        FormField::Age => "Age",
        FormField::Dob => "DOB",
        FormField::Address => "Address",
    }
}

#[cfg(test)]
mod tests {
    use super::{render_form, render_records};
    use userdata_core::{FormField, FormState, RecordItem, UiState};

    #[test]
    fn empty_list_shows_placeholder() {
        assert_eq!(
            render_records(&UiState::Empty),
            "No user records available yet.\n"
        );
    }

    #[test]
    fn records_render_as_cards() {
        let state = UiState::Success(vec![
            RecordItem {
                id: 2,
                name: "Bo".to_string(),
                age: 40,
                date_of_birth: "2/2/1984".to_string(),
                address: "2 Side St".to_string(),
            },
            RecordItem {
                id: 1,
                name: "Ann".to_string(),
                age: 30,
                date_of_birth: "1/1/1994".to_string(),
                address: "1 Main St".to_string(),
            },
        ]);

        assert_eq!(
            render_records(&state),
            "- Bo\n  Age: 40\n  Date of birth: 2/2/1984\n  Address: 2 Side St\n\n\
             - Ann\n  Age: 30\n  Date of birth: 1/1/1994\n  Address: 1 Main St\n"
        );
    }

    #[test]
    fn form_lists_errors_under_fields() {
        let mut form = FormState::default();
        form.set_field(FormField::Name, "Bo".to_string());
        form.set_field(FormField::Age, "-5".to_string());

        assert_eq!(
            render_form(&form),
            "Name: Bo\nAge: -5\n  ! Age cannot be negative\nDOB: \nAddress: \n"
        );
    }
}

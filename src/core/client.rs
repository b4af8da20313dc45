use std::path::Path;

/// Name used when the filename does not follow the naming convention
pub const DEFAULT_CLIENT_NAME: &str = "Client";

/// Derive the client name from a workbook filename.
///
/// Files are named `<Prefix>_<Prefix>_<Name tokens...>_<Suffix>.xlsx`; with
/// at least four underscore-separated tokens, everything between the second
/// and the last token is the client's name, title-cased.
pub fn client_name_from_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 4 {
        return DEFAULT_CLIENT_NAME.to_string();
    }

    title_case(&parts[2..parts.len() - 1].join(" "))
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_tokens_form_the_name() {
        assert_eq!(
            client_name_from_filename("Portfolio_Computation_Jane_Doe_March"),
            "Jane Doe"
        );
    }

    #[test]
    fn extension_and_directories_ignored() {
        assert_eq!(
            client_name_from_filename("uploads/Portfolio_Computation_Jane_Doe_March.xlsx"),
            "Jane Doe"
        );
    }

    #[test]
    fn name_is_title_cased() {
        assert_eq!(
            client_name_from_filename("Portfolio_Computation_RAVI_kumar_SHARMA_Q3.xlsx"),
            "Ravi Kumar Sharma"
        );
        assert_eq!(
            client_name_from_filename("a_b_o'neil_c.xlsx"),
            "O'Neil"
        );
    }

    #[test]
    fn single_middle_token() {
        assert_eq!(client_name_from_filename("Portfolio_Computation_Mehta_2024.xlsx"), "Mehta");
    }

    #[test]
    fn too_few_tokens_falls_back() {
        assert_eq!(client_name_from_filename("Portfolio_Report.xlsx"), DEFAULT_CLIENT_NAME);
        assert_eq!(client_name_from_filename("a_b_c.xlsx"), "Client");
        assert_eq!(client_name_from_filename(""), "Client");
    }
}

use serde::{Deserialize, Serialize};

/// Letterhead printed at the top of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub address: String,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl CompanyInfo {
    /// Letterhead used when the configuration has no `[company]` table.
    pub fn pluriservice() -> Self {
        Self {
            name: "Pluriservice Solutions".to_string(),
            address: "via F.Santi, 22 | Z.I. Bassette 48123 Ravenna (RA) | ITALY".to_string(),
            website: Some("https://www.pluriservice.it".to_string()),
            phone: Some("+39 0544 456669".to_string()),
        }
    }

    /// Header lines in print order, skipping unset contact details.
    pub fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        if is_printable(&self.address) {
            lines.push(self.address.clone());
        }

        let contacts: Vec<&str> = [self.website.as_deref(), self.phone.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| is_printable(s))
            .collect();
        if !contacts.is_empty() {
            lines.push(contacts.join(" | "));
        }
        lines
    }
}

/// Blank values and `${VAR}` placeholders left by an unset variable are not printed.
fn is_printable(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !(value.starts_with("${") && value.ends_with('}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lines_skip_missing_contacts() {
        let company = CompanyInfo {
            name: "ACME".to_string(),
            address: String::new(),
            website: None,
            phone: Some("555-0100".to_string()),
        };
        assert_eq!(company.header_lines(), vec!["ACME", "555-0100"]);
    }

    #[test]
    fn test_header_lines_skip_unset_placeholders() {
        let company = CompanyInfo {
            phone: Some("${SHEET_COMPANY_PHONE}".to_string()),
            ..CompanyInfo::pluriservice()
        };
        let header = company.header_lines();
        assert_eq!(header.len(), 3);
        assert_eq!(header[2], "https://www.pluriservice.it");
    }
}

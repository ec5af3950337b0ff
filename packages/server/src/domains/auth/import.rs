//! Bulk credential import from `email,password` CSV exports.

use super::actions::normalize_email;
use super::password::sanitize;

/// One usable row from an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRow {
    pub email: String,
    pub password: String,
}

/// Parse an import file. The first non-empty line is a header and is skipped,
/// as are rows missing either field.
pub fn parse_credential_rows(contents: &str) -> Vec<CredentialRow> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split(',');
            let email = normalize_email(fields.next()?);
            let password = sanitize(fields.next()?);
            if email.is_empty() || password.is_empty() {
                return None;
            }
            Some(CredentialRow { email, password })
        })
        .collect()
}

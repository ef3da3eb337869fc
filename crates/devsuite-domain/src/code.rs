//! Sequential client short codes (`SAN001`) and invoice numbers (`SAN001-0001`).
//!
//! Both generators only compute the next candidate from the codes already in
//! use. Uniqueness is enforced by the store; callers retry on conflict.

/// Maximum length of a client short code.
pub const SHORT_CODE_MAX_LEN: usize = 6;

const SHORT_CODE_PREFIX_LEN: usize = 3;
const SHORT_CODE_MAX_SEQ: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeError {
    #[error("short code prefix {0} has no free sequence numbers")]
    ShortCodesExhausted(String),
    #[error("cannot derive a short code from an empty name")]
    EmptyName,
}

/// First three characters of the upper-cased client name.
///
/// Upper-casing can expand a character (`ß` becomes `SS`), so it happens
/// before the cut to keep the prefix at three characters.
pub fn short_code_prefix(name: &str) -> String {
    name.trim()
        .to_uppercase()
        .chars()
        .take(SHORT_CODE_PREFIX_LEN)
        .collect()
}

/// Next free short code for `name`, given every existing code sharing its prefix.
///
/// Codes whose suffix is not a number are ignored.
pub fn next_short_code<'a, I>(name: &str, existing: I) -> Result<String, CodeError>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = short_code_prefix(name);
    if prefix.is_empty() {
        return Err(CodeError::EmptyName);
    }
    let next = max_suffix(&prefix, existing) + 1;
    if next > SHORT_CODE_MAX_SEQ {
        return Err(CodeError::ShortCodesExhausted(prefix));
    }
    Ok(format!("{prefix}{next:03}"))
}

/// Prefix shared by every invoice number of a client.
pub fn invoice_number_prefix(client_code: &str) -> String {
    format!("{client_code}-")
}

/// Next invoice number for a client, given its existing invoice numbers.
pub fn next_invoice_number<'a, I>(client_code: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = invoice_number_prefix(client_code);
    let next = max_suffix(&prefix, existing) + 1;
    format!("{prefix}{next:04}")
}

fn max_suffix<'a, I>(prefix: &str, existing: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(|code| code.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

pub mod ad;
pub mod admin;
pub mod article;
pub mod category;

/// Form fields that are missing, empty or whitespace-only count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

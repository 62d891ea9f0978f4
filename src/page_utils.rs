/*!
 * Page-selection parsing.
 *
 * Front ends collect page subsets as strings like `"1-3,5,7"` (one-based,
 * inclusive ranges). The pipeline wants a sorted, deduplicated, zero-based
 * list. An empty selection means the whole document.
 */

use crate::errors::PageSelectionError;

/// Parse a one-based page-selection string into zero-based page indices.
///
/// Returns `None` for an empty selection. Pages must be positive and ranges
/// must not be reversed.
pub fn parse_page_selection(input: &str) -> Result<Option<Vec<usize>>, PageSelectionError> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Ok(None);
    }

    let mut pages = Vec::new();
    for part in compact.split(',') {
        if let Some((start_str, end_str)) = part.split_once('-') {
            let start = parse_page_number(start_str, part)?;
            let end = parse_page_number(end_str, part)?;
            if start > end {
                return Err(PageSelectionError(format!(
                    "invalid range '{}': start must not exceed end",
                    part
                )));
            }
            pages.extend(start - 1..end);
        } else {
            let page = parse_page_number(part, part)?;
            pages.push(page - 1);
        }
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(Some(pages))
}

fn parse_page_number(text: &str, context: &str) -> Result<usize, PageSelectionError> {
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(PageSelectionError(format!(
            "invalid page in '{}': pages are numbered from 1",
            context
        ))),
        Err(_) => Err(PageSelectionError(format!("invalid input '{}'", context))),
    }
}

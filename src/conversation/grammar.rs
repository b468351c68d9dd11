//! The add-item instruction: `item-<id>, count-<count>; item-<id>, count-<count>; ...`
//!
//! Whitespace around `,` and `;` is ignored. Either every segment parses or the whole
//! instruction is rejected.

use thiserror::Error;

/// Usage text shown when an add instruction does not parse.
pub const ADD_ITEMS_USAGE: &str = "Please use this format to update your order.
`/order add item-[itemId], count-[count]; item-[itemId], count-[count]; ...`

Eg. To order 3 shirts and 2 native-men laundry where the shirt's itemId is 5 and native-men's itemId is 2 (as seen from `/info`),
Use => `/order add item-5, count-3; item-2, count-2`

Make sure to add the commas and semicolons";

/// One `item-<id>, count-<count>` pair, exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub item_id: String,
    pub count: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("nothing to add")]
    Empty,

    #[error("segment {index} is empty")]
    EmptySegment { index: usize },

    #[error("segment {index} should look like `item-<id>, count-<count>`: {segment:?}")]
    Malformed { index: usize, segment: String },
}

/// Parses an add instruction into its item/count pairs, in the order written.
pub fn parse_add_items(input: &str) -> Result<Vec<ItemRequest>, GrammarError> {
    if input.trim().is_empty() {
        return Err(GrammarError::Empty);
    }

    input
        .split(';')
        .enumerate()
        .map(|(index, segment)| parse_segment(index, segment))
        .collect()
}

fn parse_segment(index: usize, segment: &str) -> Result<ItemRequest, GrammarError> {
    if segment.trim().is_empty() {
        return Err(GrammarError::EmptySegment { index });
    }
    let malformed = || GrammarError::Malformed {
        index,
        segment: segment.trim().to_string(),
    };

    let mut parts = segment.split(',');
    let (item, count) = match (parts.next(), parts.next(), parts.next()) {
        (Some(item), Some(count), None) => (item, count),
        _ => return Err(malformed()),
    };

    let item_id = keyed_value(item, "item").ok_or_else(malformed)?;
    let count = keyed_value(count, "count").ok_or_else(malformed)?;
    Ok(ItemRequest { item_id, count })
}

/// `key-value`, with the value taken after the first `-`.
fn keyed_value(part: &str, key: &str) -> Option<String> {
    let (name, value) = part.trim().split_once('-')?;
    let value = value.trim();
    if !name.trim().eq_ignore_ascii_case(key)
        || value.is_empty()
        || value.contains(char::is_whitespace)
    {
        return None;
    }
    Some(value.to_string())
}

//! Envelope parsing for listing and detail responses
//!
//! The upstream API wraps listings in `{data: {children: [{data: {...}}]}}`
//! and serves detail pages as a two-element array where index 0 is the item
//! itself and index 1 is its comment tree. That fixed two-part shape is part
//! of the upstream contract, not configuration.

use crate::harvest::{CommentRecord, ItemRecord};
use serde::Deserialize;
use thiserror::Error;

/// Comment nodes with this kind are placeholders ("load more"), not comments
const PLACEHOLDER_KIND: &str = "more";

/// Errors that can occur while parsing response envelopes
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Detail response is not the expected two-part structure")]
    DetailShape,
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawItem,
}

// Fields are optional so entries failing the presence check can be skipped
// instead of rejecting the whole envelope
#[derive(Debug, Deserialize)]
struct RawItem {
    title: Option<String>,
    author: Option<String>,
    permalink: Option<String>,
    upvote_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DetailNode {
    data: CommentListing,
}

#[derive(Debug, Deserialize)]
struct CommentListing {
    #[serde(default)]
    children: Vec<CommentChild>,
}

#[derive(Debug, Deserialize)]
struct CommentChild {
    kind: String,
    data: RawComment,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    author: Option<String>,
    body: Option<String>,
    ups: Option<i64>,
}

/// Parses a listing response into item records, in response order
///
/// Entries missing any required field are skipped; no deduplication happens
/// here (that is the collector's job).
pub fn parse_listing(raw: &str) -> Result<Vec<ItemRecord>, ParseError> {
    let envelope: ListingEnvelope = serde_json::from_str(raw)?;

    let items = envelope
        .data
        .children
        .into_iter()
        .filter_map(|child| {
            let item = child.data;
            Some(ItemRecord {
                title: item.title?,
                author: item.author?,
                permalink: item.permalink?,
                upvote_ratio: item.upvote_ratio?,
            })
        })
        .collect();

    Ok(items)
}

/// Parses a detail response into comment records
///
/// The comment tree is taken from the fixed sibling index 1. Placeholder
/// ("more") nodes and nodes failing the presence check are skipped.
pub fn parse_comments(raw: &str) -> Result<Vec<CommentRecord>, ParseError> {
    let envelope: Vec<DetailNode> = serde_json::from_str(raw)?;

    let comment_tree = envelope.into_iter().nth(1).ok_or(ParseError::DetailShape)?;

    let comments = comment_tree
        .data
        .children
        .into_iter()
        .filter(|child| child.kind != PLACEHOLDER_KIND)
        .filter_map(|child| {
            let comment = child.data;
            Some(CommentRecord {
                author: comment.author?,
                body: comment.body?,
                upvotes: comment.ups?,
            })
        })
        .collect();

    Ok(comments)
}

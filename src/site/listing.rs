//! Directory enumeration for index pages.

use std::collections::BTreeSet;
use std::path::Path;

use crate::http::mime::extension;
use crate::site::templates::ListingEntry;

/// Immediate children of a directory, split into what is shown and how
/// many were hidden.
#[derive(Debug, Default)]
pub struct Listing {
    /// Visible entries, sorted by name
    pub entries: Vec<ListingEntry>,
    pub ignored: usize,
}

/// Reads `dir` and filters out entries whose extension is hidden.
///
/// Fails when the directory cannot be read, which callers treat as the
/// directory being unreadable.
pub async fn read_listing(dir: &Path, hidden: &BTreeSet<String>) -> std::io::Result<Listing> {
    let mut listing = Listing::default();
    let mut read_dir = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if hidden.contains(extension(&name)) {
            listing.ignored += 1;
            continue;
        }
        // Follows symlinks, unlike DirEntry::file_type.
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        listing.entries.push(ListingEntry { name, is_dir });
    }

    listing.entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listing)
}

//! Type and tag facets over the aggregated (pre-truncation) result list.

use std::collections::HashMap;

use crate::models::{Facets, SearchResult, SourceType, TagFacet, TypeFacet};

/// Default number of tag buckets kept.
pub const DEFAULT_TAG_LIMIT: usize = 25;

/// Count results per type and tag occurrences per tag.
///
/// Both lists are sorted by count descending with a stable sort, so equal
/// counts keep first-encounter order. The tag list is cut to `tag_limit`
/// entries; the type list has at most five entries and is never cut.
pub fn build_facets(results: &[SearchResult], tag_limit: usize) -> Facets {
    let mut types: Vec<TypeFacet> = Vec::new();
    let mut type_index: HashMap<SourceType, usize> = HashMap::new();

    let mut tags: Vec<TagFacet> = Vec::new();
    let mut tag_index: HashMap<&str, usize> = HashMap::new();

    for result in results {
        match type_index.get(&result.source_type) {
            Some(&i) => types[i].count += 1,
            None => {
                type_index.insert(result.source_type, types.len());
                types.push(TypeFacet {
                    source_type: result.source_type,
                    count: 1,
                });
            }
        }

        for tag in result.metadata.tags() {
            match tag_index.get(tag.as_str()) {
                Some(&i) => tags[i].count += 1,
                None => {
                    tag_index.insert(tag.as_str(), tags.len());
                    tags.push(TagFacet {
                        tag: tag.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    types.sort_by(|a, b| b.count.cmp(&a.count));
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags.truncate(tag_limit);

    Facets { types, tags }
}

use log::warn;
use tree_sitter::{Node, Query, QueryCursor, StreamingIterator};

// Helper functions shared by the tree-sitter extractors

pub fn get_node_text(node: Node, source: &str) -> String {
    let start_byte = node.start_byte();
    let end_byte = node.end_byte();

    if start_byte >= source.len() || end_byte > source.len() {
        return String::new();
    }

    source[start_byte..end_byte].to_string()
}

/// Node text with whitespace runs collapsed, for expressions that span lines.
pub fn get_compact_text(node: Node, source: &str) -> String {
    get_node_text(node, source)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn field_text(node: Node, field_name: &str, source: &str) -> Option<String> {
    node.child_by_field_name(field_name)
        .map(|child| get_compact_text(child, source))
}

/// Runs a compiled query below `root` and returns the nodes bound to `capture_name`.
pub fn execute_query<'a>(
    query: &Query,
    root: Node<'a>,
    source: &'a [u8],
    capture_name: &str,
) -> Vec<Node<'a>> {
    let mut result = Vec::new();

    let Some(capture_idx) = query.capture_index_for_name(capture_name) else {
        warn!("Query has no capture named {}", capture_name);
        return result;
    };

    let mut query_cursor = QueryCursor::new();
    let mut matches = query_cursor.matches(query, root, source);

    while let Some(match_result) = matches.next() {
        for capture in match_result.captures {
            if capture.index == capture_idx {
                result.push(capture.node);
            }
        }
    }

    result
}

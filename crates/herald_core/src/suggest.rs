//! The suggestion engine.
//!
//! Mirrors the dispatcher's walk, but stops at the cursor: the text
//! before the last whitespace is walked with complete tokens, and the
//! trailing partial token selects completions at the walk frontier.
//! Literal children contribute their spellings; parameter children ask
//! their providers. Results are de-duplicated preserving insertion order.

use std::collections::HashSet;
use std::sync::Arc;

use herald_foundation::StringStream;

use crate::actor::Actor;
use crate::context::ExecutionContext;
use crate::tree::{CommandTree, NodeId, NodeKind};

/// Produces completions for `input` with the cursor at byte `cursor`.
pub(crate) fn suggest<A: Actor>(
    tree: &CommandTree<A>,
    actor: Arc<A>,
    input: &str,
    cursor: usize,
) -> Vec<String> {
    let cursor = floor_char_boundary(input, cursor.min(input.len()));
    let truncated = &input[..cursor];

    // The trailing partial token starts after the last whitespace.
    let partial_start = truncated
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    let partial = &truncated[partial_start..];

    let shared_input: Arc<str> = Arc::from(input);
    let ctx = ExecutionContext::new(actor, Arc::clone(&shared_input));
    let head = StringStream::new(Arc::clone(&shared_input));

    let mut frontier = Vec::new();
    collect_frontier(
        tree,
        NodeId::ROOT,
        head,
        partial_start,
        ctx,
        &mut frontier,
    );

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (node, ctx) in &frontier {
        for &child in &tree.node(*node).children {
            match &tree.node(child).kind {
                NodeKind::Literal(literal) => {
                    for spelling in
                        std::iter::once(literal.spelling()).chain(literal.aliases().iter().map(String::as_str))
                    {
                        push_candidate(spelling, partial, &mut seen, &mut out);
                    }
                }
                NodeKind::Parameter(parameter) => {
                    let Some(provider) = &parameter.suggestions else {
                        continue;
                    };
                    let mut at_partial = StringStream::new(Arc::clone(&shared_input));
                    at_partial.set_position(partial_start);
                    for candidate in provider.suggestions(&at_partial.view(), ctx) {
                        push_candidate(&candidate, partial, &mut seen, &mut out);
                    }
                }
                NodeKind::Root => {}
            }
        }
    }
    out
}

/// Walks complete tokens up to `limit`, collecting every node the input
/// prefix can reach.
fn collect_frontier<A: Actor>(
    tree: &CommandTree<A>,
    node: NodeId,
    mut stream: StringStream,
    limit: usize,
    ctx: ExecutionContext<A>,
    frontier: &mut Vec<(NodeId, ExecutionContext<A>)>,
) {
    stream.skip_whitespace();
    if stream.position() >= limit {
        frontier.push((node, ctx));
        return;
    }

    let token = match stream.fork().read_unquoted_string() {
        Ok(token) => token,
        Err(_) => {
            frontier.push((node, ctx));
            return;
        }
    };

    let current = tree.node(node);
    let literal_child = current.children.iter().copied().find(|&child| {
        matches!(&tree.node(child).kind, NodeKind::Literal(l) if l.matches(&token))
    });
    if let Some(child) = literal_child {
        let mut next = stream.fork();
        let _ = next.read_unquoted_string();
        collect_frontier(tree, child, next, limit, ctx, frontier);
        return;
    }

    for &child in &current.children {
        let NodeKind::Parameter(parameter) = &tree.node(child).kind else {
            continue;
        };
        let mut fork = stream.fork();
        let mut forked_ctx = ctx.clone();
        if let Ok(value) = parameter.parser.parse(&mut fork, &forked_ctx) {
            // A parser may run past the partial token (greedy strings);
            // such branches have no frontier before the cursor.
            if fork.position() <= limit {
                forked_ctx.push_arg(&parameter.param.name, value);
                collect_frontier(tree, child, fork, limit, forked_ctx, frontier);
            }
        }
    }
}

fn push_candidate(candidate: &str, partial: &str, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    if candidate.is_empty() {
        return;
    }
    if !partial.is_empty()
        && !candidate.to_lowercase().starts_with(&partial.to_lowercase())
    {
        return;
    }
    if seen.insert(candidate.to_string()) {
        out.push(candidate.to_string());
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

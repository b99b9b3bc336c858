//! Macro expansion: rewriting `repeat_last` markers into literal node
//! runs before execution.

use burin_sequence::PatternContext;

use crate::node::Node;
use crate::resolver;

/// Hard cap on the expanded node count. Expansion stops (keeping the
/// partial list) rather than letting a runaway marker exhaust memory.
pub const MAX_NODES: usize = 8192;

/// Expand every `RepeatLast` marker into literal copies of the nodes
/// preceding it.
///
/// A single backward scan: at each marker, the `steps` nodes before it
/// are spliced in `times` copies at the marker's position, giving
/// original-then-repeated execution order. The scan continues down
/// through the spliced copies, so nested markers duplicated by an
/// outer expansion resolve in the same pass. `times` may be an
/// expression, resolved at expansion time.
pub fn expand(nodes: &[Node], ctx: &mut PatternContext, depth: u32) -> Vec<Node> {
    let mut nodes = nodes.to_vec();
    let mut i = nodes.len();
    while i > 0 {
        i -= 1;
        let Node::RepeatLast { steps, times } = &nodes[i] else {
            continue;
        };
        let steps = *steps;
        let times = resolver::resolve_count(ctx, &times.clone(), depth);
        nodes.remove(i);

        if steps == 0 || steps > i {
            continue;
        }
        let run: Vec<Node> = nodes[i - steps..i].to_vec();
        let mut capped = false;
        for _ in 0..times {
            if nodes.len() + steps > MAX_NODES {
                capped = true;
                break;
            }
            nodes.splice(i..i, run.iter().cloned());
            i += steps;
        }
        if capped {
            log::error!(
                "macro expansion exceeded {MAX_NODES} nodes; continuing with partial list"
            );
            break;
        }
    }
    nodes
}

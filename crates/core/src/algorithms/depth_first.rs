use std::future::Future;
use std::pin::Pin;

use crate::dataset::{Node, NodeState};
use crate::render::Snapshot;
use crate::VisualiserError;

use super::{Flow, Stepper};

pub const LISTING: &str = "\
procedure dfs(node)
  mark node as current
  process node
  for each child of node
    if child is unvisited
      dfs(child)
  mark node as visited";

pub mod line {
    use crate::signal::LineId;

    pub const ENTER: LineId = LineId::new(2);
    pub const PROCESS: LineId = LineId::new(3);
    pub const VISITED: LineId = LineId::new(7);

    pub const ALL: [LineId; 3] = [ENTER, PROCESS, VISITED];
}

pub(crate) async fn run(root: &mut Node, stepper: &mut Stepper<'_>) -> Flow {
    let id = root.id;
    visit(root, id, stepper).await
}

type StepFuture<'a> = Pin<Box<dyn Future<Output = Flow> + 'a>>;

fn set_state(root: &mut Node, id: usize, state: NodeState) -> Flow {
    match root.find_mut(id) {
        Some(node) => {
            node.state = state;
            Ok(())
        }
        None => Err(VisualiserError::msg(format!("node {id} is not part of the tree")).into()),
    }
}

/// Pre-order visit of `id`. Children are visited left to right, each one's
/// subtree completing before its next sibling is considered.
fn visit<'a>(root: &'a mut Node, id: usize, stepper: &'a mut Stepper<'_>) -> StepFuture<'a> {
    Box::pin(async move {
        set_state(root, id, NodeState::Current)?;
        stepper.step(Snapshot::Tree(root), line::ENTER).await?;
        set_state(root, id, NodeState::Processing)?;
        stepper.step(Snapshot::Tree(root), line::PROCESS).await?;

        let children = root.find(id).map(Node::child_states).unwrap_or_default();
        for (child, _) in children {
            let unvisited = root
                .find(child)
                .is_some_and(|node| node.state == NodeState::Default);
            if unvisited {
                visit(root, child, stepper).await?;
            }
        }

        set_state(root, id, NodeState::Visited)?;
        stepper.step(Snapshot::Tree(root), line::VISITED).await
    })
}

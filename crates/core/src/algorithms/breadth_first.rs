use std::collections::VecDeque;

use crate::dataset::{Node, NodeState};
use crate::render::Snapshot;
use crate::VisualiserError;

use super::{Flow, Halt, Stepper};

pub const LISTING: &str = "\
procedure bfs(root)
  queue <- [root]
  mark root as discovered
  while queue is not empty
    node <- dequeue(queue)
    for each child of node
      if child is undiscovered
        mark child as discovered
        enqueue(queue, child)
    mark node as visited";

pub mod line {
    use crate::signal::LineId;

    pub const START: LineId = LineId::new(2);
    pub const DISCOVER_ROOT: LineId = LineId::new(3);
    pub const DEQUEUE: LineId = LineId::new(5);
    pub const ENQUEUE: LineId = LineId::new(9);
    pub const VISITED: LineId = LineId::new(10);

    pub const ALL: [LineId; 5] = [START, DISCOVER_ROOT, DEQUEUE, ENQUEUE, VISITED];
}

fn mark(root: &mut Node, id: usize, state: NodeState) -> Flow {
    let node = root
        .find_mut(id)
        .ok_or_else(|| VisualiserError::msg(format!("node {id} is not part of the tree")))?;
    node.state = state;
    Ok(())
}

/// Level-order traversal driven by a strict FIFO queue of node ids.
pub(crate) async fn run(root: &mut Node, stepper: &mut Stepper<'_>) -> Flow {
    let mut queue = VecDeque::from([root.id]);

    root.state = NodeState::Current;
    stepper.step(Snapshot::Tree(root), line::START).await?;
    root.state = NodeState::Processing;
    stepper.step(Snapshot::Tree(root), line::DISCOVER_ROOT).await?;

    while let Some(id) = queue.pop_front() {
        mark(root, id, NodeState::Current)?;
        stepper.step(Snapshot::Tree(root), line::DEQUEUE).await?;

        let children = root
            .find(id)
            .map(Node::child_states)
            .ok_or_else(|| Halt::Failed(VisualiserError::msg("dequeued node vanished")))?;
        for (child, state) in children {
            if state == NodeState::Default {
                mark(root, child, NodeState::Processing)?;
                queue.push_back(child);
                stepper.step(Snapshot::Tree(root), line::ENQUEUE).await?;
            }
        }

        mark(root, id, NodeState::Visited)?;
        stepper.step(Snapshot::Tree(root), line::VISITED).await?;
    }

    Ok(())
}

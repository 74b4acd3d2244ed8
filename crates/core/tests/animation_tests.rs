use std::collections::HashSet;
use std::time::Duration;

use algo_visualiser_core::algorithms::{breadth_first, bubble_sort, depth_first, quick_sort};
use algo_visualiser_core::{
    AlgorithmKind, AnimationController, Dataset, ElementState, Frame, LineId, NodeState,
    RandomValues, RecordEvent, Recorder, RenderTarget, RunOutcome, ScriptedValues, StopHandle,
    VisualiserError,
};
use tokio::time::Instant;
use tokio_test::{assert_pending, assert_ready, task};

fn scripted(kind: AlgorithmKind, values: &[u32]) -> (AnimationController, Recorder) {
    let recorder = Recorder::default();
    let mut controller = AnimationController::new(kind)
        .with_array_size(values.len())
        .with_values(ScriptedValues::new(values.to_vec()));
    controller
        .initialize(recorder.clone(), 800.0, 400.0, Some(recorder.line_sink()))
        .unwrap();
    (controller, recorder)
}

fn tree(kind: AlgorithmKind) -> (AnimationController, Recorder) {
    let recorder = Recorder::default();
    let mut controller = AnimationController::new(kind);
    controller
        .initialize(recorder.clone(), 800.0, 400.0, Some(recorder.line_sink()))
        .unwrap();
    (controller, recorder)
}

fn sorted_copy(values: &[u32]) -> Vec<u32> {
    let mut values = values.to_vec();
    values.sort_unstable();
    values
}

/// Node ids in the order they first reached `state` across the recorded frames.
fn first_reached(frames: &[Dataset], state: NodeState) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for frame in frames {
        let root = frame.as_tree().expect("tree frame");
        for node in root.preorder() {
            if node.state == state && seen.insert(node.id) {
                order.push(node.id);
            }
        }
    }
    order
}

#[tokio::test(start_paused = true)]
async fn bubble_sort_scenario_ends_sorted_and_tagged() {
    let (mut controller, recorder) = scripted(AlgorithmKind::BubbleSort, &[5, 3, 1, 4, 2]);

    let outcome = controller.animate(1.0).await.unwrap();

    assert!(outcome.is_completed());
    let dataset = controller.dataset().unwrap();
    assert_eq!(dataset.values(), vec![1, 2, 3, 4, 5]);
    assert!(dataset
        .as_array()
        .unwrap()
        .iter()
        .all(|element| element.state == ElementState::Sorted));
    assert_eq!(recorder.lines().unwrap().last(), Some(&LineId::IDLE));
    assert!(!controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn quick_sort_scenario_uses_last_element_as_pivot() {
    let (mut controller, recorder) = scripted(AlgorithmKind::QuickSort, &[3, 1, 2]);

    let outcome = controller.animate(1.0).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed { steps: 5 });
    assert_eq!(controller.dataset().unwrap().values(), vec![1, 2, 3]);
    assert_eq!(
        recorder.lines().unwrap(),
        vec![
            quick_sort::line::PIVOT,
            quick_sort::line::COMPARE,
            quick_sort::line::COMPARE,
            quick_sort::line::SWAP,
            quick_sort::line::PLACE_PIVOT,
            LineId::IDLE,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn sorts_produce_ordered_permutations() {
    for kind in [AlgorithmKind::BubbleSort, AlgorithmKind::QuickSort] {
        for seed in 0..20 {
            let recorder = Recorder::default();
            let mut controller =
                AnimationController::new(kind).with_values(RandomValues::seeded(seed));
            controller
                .initialize(recorder.clone(), 640.0, 480.0, None)
                .unwrap();
            let initial = sorted_copy(&controller.dataset().unwrap().values());

            let outcome = controller.animate(3.0).await.unwrap();
            assert!(outcome.is_completed(), "{kind} seed {seed}");

            let values = controller.dataset().unwrap().values();
            assert_eq!(values.len(), 15);
            assert!(values.windows(2).all(|pair| pair[0] <= pair[1]), "{kind} seed {seed}");
            assert_eq!(sorted_copy(&values), initial);

            // every intermediate frame is a permutation too
            for frame in recorder.frames().unwrap() {
                assert_eq!(sorted_copy(&frame.values()), initial);
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn comparison_and_pivot_tags_stay_exclusive() {
    for kind in [AlgorithmKind::BubbleSort, AlgorithmKind::QuickSort] {
        let recorder = Recorder::default();
        let mut controller = AnimationController::new(kind).with_values(RandomValues::seeded(11));
        controller
            .initialize(recorder.clone(), 800.0, 400.0, None)
            .unwrap();
        controller.animate(2.0).await.unwrap();

        for frame in recorder.frames().unwrap() {
            let elements = frame.as_array().unwrap();
            let tagged = |state: ElementState| {
                elements
                    .iter()
                    .enumerate()
                    .filter(|(_, element)| element.state == state)
                    .map(|(position, _)| position)
                    .collect::<Vec<_>>()
            };
            let comparing = tagged(ElementState::Comparing);
            match kind {
                AlgorithmKind::BubbleSort => {
                    assert!(comparing.is_empty() || comparing.len() == 2);
                    if let [left, right] = comparing[..] {
                        assert_eq!(left + 1, right);
                    }
                    assert!(tagged(ElementState::Pivot).is_empty());
                }
                _ => {
                    assert!(comparing.len() <= 1);
                    assert!(tagged(ElementState::Pivot).len() <= 1);
                }
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn breadth_first_visits_in_level_order() {
    let (mut controller, recorder) = tree(AlgorithmKind::BreadthFirstSearch);

    let outcome = controller.animate(1.0).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed { steps: 22 });
    let frames = recorder.frames().unwrap();
    assert_eq!(first_reached(&frames, NodeState::Visited), vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(first_reached(&frames, NodeState::Processing), vec![0, 1, 2, 3, 4, 5, 6]);

    let root = controller.dataset().unwrap().as_tree().unwrap();
    let depths: Vec<usize> = first_reached(&frames, NodeState::Visited)
        .into_iter()
        .map(|id| root.depth_of(id).unwrap())
        .collect();
    assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(root.preorder().iter().all(|node| node.state == NodeState::Visited));

    let lines = recorder.lines().unwrap();
    assert_eq!(lines[..3], [
        breadth_first::line::START,
        breadth_first::line::DISCOVER_ROOT,
        breadth_first::line::DEQUEUE,
    ]);
}

#[tokio::test(start_paused = true)]
async fn depth_first_finishes_left_subtree_first() {
    let (mut controller, recorder) = tree(AlgorithmKind::DepthFirstSearch);

    let outcome = controller.animate(1.0).await.unwrap();

    assert_eq!(outcome, RunOutcome::Completed { steps: 21 });
    let frames = recorder.frames().unwrap();
    assert_eq!(first_reached(&frames, NodeState::Current), vec![0, 1, 3, 4, 2, 5, 6]);
    assert_eq!(first_reached(&frames, NodeState::Visited), vec![3, 4, 1, 5, 6, 2, 0]);
    assert_eq!(recorder.lines().unwrap()[..3], [
        depth_first::line::ENTER,
        depth_first::line::PROCESS,
        depth_first::line::ENTER,
    ]);
}

#[tokio::test(start_paused = true)]
async fn traversal_states_never_regress() {
    for kind in [AlgorithmKind::BreadthFirstSearch, AlgorithmKind::DepthFirstSearch] {
        let (mut controller, recorder) = tree(kind);
        controller.animate(1.0).await.unwrap();

        let frames = recorder.frames().unwrap();
        for pair in frames.windows(2) {
            let before = pair[0].as_tree().unwrap();
            let after = pair[1].as_tree().unwrap();
            for node in before.preorder() {
                let next = after.find(node.id).unwrap().state;
                if node.state != NodeState::Default {
                    assert_ne!(next, NodeState::Default, "{kind} node {}", node.id);
                }
                if node.state == NodeState::Visited {
                    assert_eq!(next, NodeState::Visited, "{kind} node {}", node.id);
                }
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn every_step_waits_one_thousandth_over_speed() {
    let (mut controller, _recorder) = scripted(AlgorithmKind::BubbleSort, &[4, 3, 2, 1]);

    let started = Instant::now();
    let outcome = controller.animate(2.0).await.unwrap();
    let elapsed = started.elapsed();

    let steps = outcome.steps();
    let expected = Duration::from_millis(500) * steps as u32;
    assert!(elapsed >= expected, "{elapsed:?} < {expected:?}");
    assert!(elapsed <= expected + Duration::from_millis(steps), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn cleanup_before_first_delay_commits_only_the_first_step() {
    let (mut controller, recorder) = scripted(AlgorithmKind::BubbleSort, &[5, 3, 1, 4, 2]);
    let stop = controller.stop_handle();

    let mut run = task::spawn(controller.animate(1.0));
    assert_pending!(run.poll());
    assert!(stop.is_running());

    stop.cleanup();
    assert!(run.is_woken());
    let outcome = assert_ready!(run.poll()).unwrap();
    drop(run);

    assert_eq!(outcome, RunOutcome::Stopped { steps: 1 });
    assert_eq!(
        recorder.lines().unwrap(),
        vec![bubble_sort::line::COMPARE, LineId::IDLE]
    );
    assert_eq!(recorder.frames().unwrap().len(), 2);

    let elements = controller.dataset().unwrap().as_array().unwrap().to_vec();
    assert_eq!(
        elements.iter().map(|e| e.value).collect::<Vec<_>>(),
        vec![5, 3, 1, 4, 2]
    );
    let states: Vec<ElementState> = elements.iter().map(|e| e.state).collect();
    assert_eq!(
        states,
        vec![
            ElementState::Comparing,
            ElementState::Comparing,
            ElementState::Default,
            ElementState::Default,
            ElementState::Default,
        ]
    );
    assert!(!controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn cleanup_mid_run_stops_all_further_activity() {
    let (mut controller, recorder) = scripted(AlgorithmKind::QuickSort, &[9, 4, 7, 1, 8, 2]);
    let stop = controller.stop_handle();

    let mut run = task::spawn(controller.animate(1.0));
    assert_pending!(run.poll());
    for _ in 0..3 {
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(run.is_woken());
        assert_pending!(run.poll());
    }

    let before = recorder.len().unwrap();
    stop.cleanup();
    let outcome = assert_ready!(run.poll()).unwrap();
    drop(run);
    assert_eq!(outcome, RunOutcome::Stopped { steps: 4 });

    tokio::time::advance(Duration::from_secs(60)).await;
    let events = recorder.events().unwrap();
    assert_eq!(events.len(), before + 1);
    assert_eq!(events.last(), Some(&RecordEvent::Line { line: LineId::IDLE }));
}

#[tokio::test(start_paused = true)]
async fn cleanup_is_idempotent() {
    let (controller, recorder) = tree(AlgorithmKind::BreadthFirstSearch);

    controller.cleanup();
    let once = recorder.events().unwrap();
    controller.cleanup();
    let twice = recorder.events().unwrap();

    assert_eq!(once, twice);
    assert_eq!(recorder.lines().unwrap(), vec![LineId::IDLE]);
    assert!(!controller.is_running());
    assert_eq!(controller.current_line(), Some(LineId::IDLE));
}

#[tokio::test(start_paused = true)]
async fn completed_runs_do_not_repeat_the_idle_signal() {
    let (mut controller, recorder) = scripted(AlgorithmKind::BubbleSort, &[1, 2]);
    controller.animate(1.0).await.unwrap();
    controller.cleanup();

    let idle = recorder
        .lines()
        .unwrap()
        .into_iter()
        .filter(|line| line.is_idle())
        .count();
    assert_eq!(idle, 1);
}

#[tokio::test(start_paused = true)]
async fn reinitialize_discards_the_previous_run() {
    let (mut controller, recorder) = tree(AlgorithmKind::DepthFirstSearch);
    controller.animate(1.0).await.unwrap();

    let fresh = Recorder::default();
    controller
        .initialize(fresh.clone(), 1024.0, 600.0, Some(fresh.line_sink()))
        .unwrap();

    let root = controller.dataset().unwrap().as_tree().unwrap();
    assert_eq!(root.node_count(), 7);
    assert!(root.preorder().iter().all(|node| node.state == NodeState::Default));
    assert_eq!(fresh.frames().unwrap().len(), 1);
    assert!(fresh.lines().unwrap().is_empty());
    assert_eq!(controller.canvas().unwrap().width, 1024.0);

    // the previous sink no longer hears anything
    let previous = recorder.len().unwrap();
    controller.cleanup();
    assert_eq!(recorder.len().unwrap(), previous);
    assert_eq!(fresh.lines().unwrap(), vec![LineId::IDLE]);
}

#[tokio::test(start_paused = true)]
async fn reinitialize_draws_a_new_random_array() {
    let recorder = Recorder::default();
    let mut controller =
        AnimationController::new(AlgorithmKind::QuickSort).with_values(RandomValues::seeded(3));
    controller
        .initialize(recorder.clone(), 800.0, 400.0, None)
        .unwrap();
    controller.animate(3.0).await.unwrap();

    controller
        .initialize(recorder.clone(), 800.0, 400.0, None)
        .unwrap();

    let elements = controller.dataset().unwrap().as_array().unwrap();
    assert_eq!(elements.len(), 15);
    assert!(elements.iter().all(|e| e.state == ElementState::Default));
    assert!(elements.iter().all(|e| (1..=100).contains(&e.value)));
    let indices: Vec<usize> = elements.iter().map(|e| e.index).collect();
    assert_eq!(indices, (0..15).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn animating_again_after_a_stop_finishes_the_sort() {
    let (mut controller, _recorder) = scripted(AlgorithmKind::BubbleSort, &[6, 5, 4, 3, 2, 1]);
    let stop = controller.stop_handle();

    let mut run = task::spawn(controller.animate(1.0));
    assert_pending!(run.poll());
    tokio::time::advance(Duration::from_secs(1)).await;
    assert_pending!(run.poll());
    stop.cleanup();
    assert!(matches!(assert_ready!(run.poll()), Ok(RunOutcome::Stopped { .. })));
    drop(run);

    let outcome = controller.animate(1.0).await.unwrap();
    assert!(outcome.is_completed());
    assert_eq!(controller.dataset().unwrap().values(), vec![1, 2, 3, 4, 5, 6]);
}

struct FailingTarget {
    remaining: usize,
}

impl RenderTarget for FailingTarget {
    fn present(&mut self, _frame: &Frame<'_>) -> algo_visualiser_core::Result<()> {
        if self.remaining == 0 {
            return Err(VisualiserError::msg("surface lost"));
        }
        self.remaining -= 1;
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn render_failures_abort_the_run_and_go_idle() {
    let recorder = Recorder::default();
    let mut controller = AnimationController::new(AlgorithmKind::BreadthFirstSearch);
    controller
        .initialize(
            FailingTarget { remaining: 3 },
            800.0,
            400.0,
            Some(recorder.line_sink()),
        )
        .unwrap();

    let err = controller.animate(1.0).await.unwrap_err();

    assert!(format!("{err}").contains("surface lost"));
    assert!(!controller.is_running());
    assert_eq!(
        recorder.lines().unwrap(),
        vec![
            breadth_first::line::START,
            breadth_first::line::DISCOVER_ROOT,
            LineId::IDLE,
        ]
    );
}

/// Issues a stop from inside `present`, after the step has passed its running
/// check but before it emits its line.
struct StopWhilePresenting {
    stop: StopHandle,
    at_step: u64,
}

impl RenderTarget for StopWhilePresenting {
    fn present(&mut self, frame: &Frame<'_>) -> algo_visualiser_core::Result<()> {
        if frame.step == self.at_step {
            self.stop.cleanup();
        }
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn stop_racing_a_step_still_ends_idle() {
    let recorder = Recorder::default();
    let mut controller = AnimationController::new(AlgorithmKind::BubbleSort)
        .with_array_size(5)
        .with_values(ScriptedValues::new(vec![5, 3, 1, 4, 2]));
    let target = StopWhilePresenting {
        stop: controller.stop_handle(),
        at_step: 3,
    };
    controller
        .initialize(target, 800.0, 400.0, Some(recorder.line_sink()))
        .unwrap();

    let outcome = controller.animate(1.0).await.unwrap();

    assert_eq!(outcome, RunOutcome::Stopped { steps: 3 });
    assert_eq!(
        recorder.lines().unwrap(),
        vec![
            bubble_sort::line::COMPARE,
            bubble_sort::line::TEMP,
            LineId::IDLE,
            bubble_sort::line::ASSIGN_LEFT,
            LineId::IDLE,
        ]
    );
    assert_eq!(controller.current_line(), Some(LineId::IDLE));
    assert!(!controller.is_running());
}

#[tokio::test(start_paused = true)]
async fn cleanup_inside_nested_depth_first_visit() {
    let (mut controller, recorder) = tree(AlgorithmKind::DepthFirstSearch);
    let stop = controller.stop_handle();

    let mut run = task::spawn(controller.animate(1.0));
    assert_pending!(run.poll());
    // five more steps: enter/process 1, enter/process 3
    for _ in 0..5 {
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_pending!(run.poll());
    }

    stop.cleanup();
    let outcome = assert_ready!(run.poll()).unwrap();
    drop(run);
    assert_eq!(outcome, RunOutcome::Stopped { steps: 6 });

    let before = recorder.len().unwrap();
    tokio::time::advance(Duration::from_secs(100)).await;
    assert_eq!(recorder.len().unwrap(), before);
    assert_eq!(
        recorder.lines().unwrap(),
        vec![
            depth_first::line::ENTER,
            depth_first::line::PROCESS,
            depth_first::line::ENTER,
            depth_first::line::PROCESS,
            depth_first::line::ENTER,
            depth_first::line::PROCESS,
            LineId::IDLE,
        ]
    );

    let root = controller.dataset().unwrap().as_tree().unwrap();
    for node in root.preorder() {
        let expected = match node.id {
            0 | 1 | 3 => NodeState::Processing,
            _ => NodeState::Default,
        };
        assert_eq!(node.state, expected, "node {}", node.id);
    }
}

#[tokio::test(start_paused = true)]
async fn cleanup_inside_quick_sort_sub_range() {
    let (mut controller, recorder) = scripted(AlgorithmKind::QuickSort, &[5, 1, 4, 2, 3]);
    let stop = controller.stop_handle();

    let mut run = task::spawn(controller.animate(1.0));
    assert_pending!(run.poll());
    // the top-level partition takes eight steps; steps 9 and 10 belong to
    // the left sub-range 0..=1
    for _ in 0..9 {
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_pending!(run.poll());
    }

    stop.cleanup();
    let outcome = assert_ready!(run.poll()).unwrap();
    drop(run);
    assert_eq!(outcome, RunOutcome::Stopped { steps: 10 });

    let before = recorder.len().unwrap();
    tokio::time::advance(Duration::from_secs(100)).await;
    assert_eq!(recorder.len().unwrap(), before);
    assert_eq!(recorder.lines().unwrap().last(), Some(&LineId::IDLE));

    let elements = controller.dataset().unwrap().as_array().unwrap();
    assert_eq!(
        elements.iter().map(|e| e.value).collect::<Vec<_>>(),
        vec![1, 2, 3, 5, 4]
    );
    assert_eq!(
        elements.iter().map(|e| e.state).collect::<Vec<_>>(),
        vec![
            ElementState::Comparing,
            ElementState::Pivot,
            ElementState::Sorted,
            ElementState::Default,
            ElementState::Default,
        ]
    );
}

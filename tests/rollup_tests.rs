//! Progress rollup invariants over assembled project trees.

use project_pulse::progress::{phase_progress, project_progress, project_report, task_progress};
use project_pulse::types::{Phase, Project, Subtask, Task};

fn subtask(status: &str) -> Subtask {
    Subtask {
        id: "s".into(),
        name: "s".into(),
        status: Some(status.into()),
        assigned_to: None,
        due_at: None,
    }
}

fn task(status: &str, subtasks: Vec<Subtask>) -> Task {
    Task {
        id: "t".into(),
        name: "t".into(),
        status: Some(status.into()),
        assigned_to: None,
        due_at: None,
        start_at: None,
        created_at: None,
        priority: None,
        tags: vec![],
        is_milestone: false,
        subtasks,
    }
}

fn phase(status: &str, tasks: Vec<Task>) -> Phase {
    Phase {
        id: "ph".into(),
        name: "ph".into(),
        status: Some(status.into()),
        start_at: None,
        end_at: None,
        responsible_id: None,
        tasks,
    }
}

const STATUSES: [&str; 5] = ["todo", "in_progress", "completed", "", "bogus"];

#[test]
fn task_progress_always_within_bounds() {
    for ts in STATUSES {
        for s1 in STATUSES {
            for s2 in STATUSES {
                let t = task(ts, vec![subtask(s1), subtask(s2)]);
                assert!(task_progress(&t) <= 100, "task={} subs=({},{})", ts, s1, s2);
            }
        }
    }
}

#[test]
fn task_progress_never_below_either_signal() {
    for ts in STATUSES {
        for ss in STATUSES {
            let with_subs = task(ts, vec![subtask(ss)]);
            let own_only = task(ts, vec![]);
            let subs_only = task("todo", vec![subtask(ss)]);
            let p = task_progress(&with_subs);
            assert!(p >= task_progress(&own_only));
            assert!(p >= task_progress(&subs_only));
        }
    }
}

#[test]
fn phase_progress_is_rounded_mean_of_tasks() {
    let tasks = vec![
        task("completed", vec![]),
        task("in_progress", vec![]),
        task("todo", vec![]),
        task("in_progress", vec![]),
    ];
    let ph = phase("in_progress", tasks.clone());

    let sum: u64 = tasks.iter().map(|t| task_progress(t) as u64).sum();
    let mean = (sum as f64 / tasks.len() as f64).round() as u8;
    assert_eq!(phase_progress(&ph), mean);
    // (100 + 50 + 0 + 50) / 4 = 50
    assert_eq!(mean, 50);
}

#[test]
fn report_progress_agrees_with_direct_computation() {
    let project = Project {
        id: "p".into(),
        name: "p".into(),
        responsible_id: None,
        phases: vec![
            phase("in_progress", vec![task("completed", vec![])]),
            phase("todo", vec![task("in_progress", vec![subtask("completed")])]),
            phase("not_started", vec![]),
        ],
    };

    let report = project_report(&project);
    assert_eq!(report.progress, project_progress(&project));
    for (ph, derived) in project.phases.iter().zip(&report.phases) {
        assert_eq!(derived.progress, phase_progress(ph));
        for (t, dt) in ph.tasks.iter().zip(&derived.tasks) {
            assert_eq!(dt.progress, task_progress(t));
        }
    }

    // Phase values 100, 100, 0 -> project round((100 + 100 + 0) / 3) = 67.
    assert_eq!(report.progress, 67);
}

#[test]
fn uniform_status_collapses_to_that_weight() {
    for (status, expected) in [("todo", 0u8), ("in_progress", 50), ("completed", 100)] {
        let project = Project {
            id: "p".into(),
            name: "p".into(),
            responsible_id: None,
            phases: vec![
                phase(status, vec![task(status, vec![subtask(status)])]),
                phase(status, vec![task(status, vec![])]),
            ],
        };
        assert_eq!(project_progress(&project), expected);
    }
}

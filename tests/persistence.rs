//! End-to-end persistence scenarios through the public library API.

use pretty_assertions::assert_eq;
use std::fs;

use todo::io::store::TaskStore;
use todo::model::Task;
use todo::ops::session::{Applied, Command, Session};

fn task(description: &str, done: bool) -> Task {
    let mut t = Task::new(description);
    t.is_done = done;
    t
}

#[test]
fn scenario_fresh_start_add_and_save() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = TaskStore::new(tmp.path().join("tasks.json"));

    let mut tasks = store.load().unwrap();
    assert_eq!(tasks, vec![]);

    tasks.push(Task::new("Buy milk"));
    assert_eq!(tasks, vec![task("Buy milk", false)]);
    store.save(&tasks).unwrap();

    assert_eq!(
        fs::read_to_string(store.path()).unwrap(),
        r#"[{"description":"Buy milk","isDone":false}]"#
    );
}

#[test]
fn scenario_toggle_second_of_two() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = TaskStore::new(tmp.path().join("tasks.json"));
    store
        .save(&[task("First", false), task("Second", false)])
        .unwrap();

    let mut tasks = store.load().unwrap();
    assert_eq!(tasks, vec![task("First", false), task("Second", false)]);
    tasks[1].is_done = !tasks[1].is_done;
    store.save(&tasks).unwrap();

    assert_eq!(
        store.load().unwrap(),
        vec![task("First", false), task("Second", true)]
    );
}

#[test]
fn scenario_remove_only_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = TaskStore::new(tmp.path().join("tasks.json"));
    store.save(&[task("Only", false)]).unwrap();

    let mut tasks = store.load().unwrap();
    tasks.remove(0);
    assert!(tasks.is_empty());
    store.save(&tasks).unwrap();
    assert_eq!(store.load().unwrap(), vec![]);
}

#[test]
fn round_trip_many_tasks_in_order() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = TaskStore::new(tmp.path().join("tasks.json"));
    let tasks: Vec<Task> = (0..50)
        .map(|i| task(&format!("task {} \u{2713} \"quoted\" \\ slash", i), i % 3 == 0))
        .collect();
    store.save(&tasks).unwrap();
    assert_eq!(store.load().unwrap(), tasks);
}

#[test]
fn session_commands_match_direct_edits() {
    let tmp = tempfile::TempDir::new().unwrap();
    let mut session = Session::open_dir(tmp.path()).unwrap();

    let mut ids = Vec::new();
    for d in ["a", "b", "c"] {
        match session
            .apply(Command::AddTask {
                project: "Tasks".into(),
                description: d.into(),
            })
            .unwrap()
        {
            Applied::Added(id) => ids.push(id),
            other => panic!("unexpected {:?}", other),
        }
    }
    session.apply(Command::ToggleTask { id: ids[0] }).unwrap();
    session
        .apply(Command::EditTask {
            id: ids[2],
            description: "C".into(),
        })
        .unwrap();
    session.apply(Command::RemoveTask { id: ids[1] }).unwrap();
    session.close().unwrap();

    let store = TaskStore::new(tmp.path().join("tasks.json"));
    assert_eq!(store.load().unwrap(), vec![task("a", true), task("C", false)]);
}

//! Session runner integration tests.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{created_at, ids, word_with_status, words};
use common::{feedback, presented, BrokenEffects, FailingStorage, RecordingEffects, RecordingSpeech};
use drill_core::{
    Cue, DrillError, DrillSession, Listening, MemoryStorage, Outcome, Phase, Repetition,
    RepetitionAnswer, RepetitionWord, SessionRunner, Status, StatusFlag, WordBuilder, WordId,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{mpsc, watch};

#[tokio::test(start_paused = true)]
async fn test_listening_retry_scenario() {
    let passed = Status::NEW.add(StatusFlag::Listening).add(StatusFlag::Repetition);
    let list = vec![
        word_with_status("a", passed),
        word_with_status("b", passed),
        word_with_status("c", passed),
    ];
    let storage = Arc::new(MemoryStorage::new(list.clone()));
    let effects = Arc::new(RecordingEffects::default());

    let runner = SessionRunner::new(Listening, list, storage.clone())
        .unwrap()
        .with_effects(effects.clone());
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    let mut order = Vec::new();
    for (n, answer) in ["wrong", "b", "c", "a"].into_iter().enumerate() {
        order.push(presented(&mut states, n + 1).await.to_string());
        tx.send(answer.to_string()).await.unwrap();
    }

    let report = task.await.unwrap().unwrap();
    assert_eq!(order, vec!["a", "b", "c", "a"]);
    assert_eq!(ids(&report.correct), vec!["b", "c"]);
    assert_eq!(ids(&report.incorrect), vec!["a"]);
    assert_eq!(report.presentations, 4);
    assert!(report.saved());

    let final_state = states.borrow().clone();
    assert_eq!(final_state.phase(), Phase::Complete);
    assert!(final_state.incorrect_ids().contains(&WordId::from("a")));

    let stored_a = storage.get(&WordId::from("a")).unwrap().unwrap();
    assert_eq!(stored_a.status, Status::NEW.add(StatusFlag::Repetition));
    assert!(stored_a.updated_at > created_at());
    let stored_b = storage.get(&WordId::from("b")).unwrap().unwrap();
    assert_eq!(stored_b.status, passed);
    assert!(stored_b.updated_at > created_at());

    tokio::task::yield_now().await;
    assert_eq!(
        effects.cues(),
        vec![Cue::Incorrect, Cue::Correct, Cue::Correct, Cue::Correct]
    );
}

#[tokio::test(start_paused = true)]
async fn test_answers_during_feedback_are_ignored() {
    let list = words(&["a", "b"]);
    let storage = Arc::new(MemoryStorage::new(list.clone()));
    let runner = SessionRunner::new(Listening, list, storage).unwrap();
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    presented(&mut states, 1).await;
    tx.send("nope".to_string()).await.unwrap();
    feedback(&mut states).await;
    tx.send("a".to_string()).await.unwrap();

    assert_eq!(presented(&mut states, 2).await.to_string(), "b");
    {
        let state = states.borrow();
        assert_eq!(state.queue().len(), 1);
        assert!(state.incorrect_ids().contains(&WordId::from("a")));
    }

    tx.send("b".to_string()).await.unwrap();
    presented(&mut states, 3).await;
    tx.send("a".to_string()).await.unwrap();

    let report = task.await.unwrap().unwrap();
    assert_eq!(ids(&report.incorrect), vec!["a"]);
    assert_eq!(report.presentations, 3);
}

#[tokio::test(start_paused = true)]
async fn test_empty_answer_causes_no_transition() {
    let list = words(&["a"]);
    let storage = Arc::new(MemoryStorage::new(list.clone()));
    let runner = SessionRunner::new(Listening, list, storage).unwrap();
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    presented(&mut states, 1).await;
    tx.send("   ".to_string()).await.unwrap();
    tx.send("A".to_string()).await.unwrap();

    let report = task.await.unwrap().unwrap();
    assert_eq!(ids(&report.correct), vec!["a"]);
    assert_eq!(report.presentations, 1);
}

#[tokio::test(start_paused = true)]
async fn test_feedback_delay_depends_on_outcome() {
    let list = words(&["a", "b", "c"]);
    let storage = Arc::new(MemoryStorage::new(list.clone()));
    let runner = SessionRunner::new(Listening, list, storage).unwrap();
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    presented(&mut states, 1).await;
    let answered = tokio::time::Instant::now();
    tx.send("a".to_string()).await.unwrap();
    presented(&mut states, 2).await;
    assert_eq!(answered.elapsed(), Duration::from_millis(1500));

    let answered = tokio::time::Instant::now();
    tx.send("x".to_string()).await.unwrap();
    presented(&mut states, 3).await;
    assert_eq!(answered.elapsed(), Duration::from_millis(3000));

    drop(tx);
    assert!(matches!(task.await.unwrap(), Err(DrillError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_session_saves_nothing() {
    let list = words(&["a", "b"]);
    let storage = Arc::new(MemoryStorage::new(list.clone()));
    let runner = SessionRunner::new(Listening, list.clone(), storage.clone()).unwrap();
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    presented(&mut states, 1).await;
    tx.send("a".to_string()).await.unwrap();
    feedback(&mut states).await;
    drop(tx);

    assert!(matches!(task.await.unwrap(), Err(DrillError::Cancelled)));
    assert_eq!(storage.words().unwrap(), list);
}

#[tokio::test(start_paused = true)]
async fn test_failed_save_keeps_results() {
    let list = words(&["a", "b"]);
    let runner = SessionRunner::new(Listening, list, Arc::new(FailingStorage))
        .unwrap()
        .with_effects(Arc::new(BrokenEffects));
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    presented(&mut states, 1).await;
    tx.send("a".to_string()).await.unwrap();
    presented(&mut states, 2).await;
    tx.send("wrong".to_string()).await.unwrap();
    presented(&mut states, 3).await;
    tx.send("b".to_string()).await.unwrap();

    let report = task.await.unwrap().unwrap();
    assert!(!report.saved());
    assert_eq!(ids(&report.correct), vec!["a"]);
    assert_eq!(ids(&report.incorrect), vec!["b"]);
}

#[tokio::test(start_paused = true)]
async fn test_listening_speaks_every_presented_word() {
    let list = words(&["a", "b"]);
    let storage = Arc::new(MemoryStorage::new(list.clone()));
    let speech = Arc::new(RecordingSpeech::default());
    let runner = SessionRunner::new(Listening, list, storage)
        .unwrap()
        .with_speech(speech.clone());
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    for (n, answer) in ["x", "b", "a"].into_iter().enumerate() {
        presented(&mut states, n + 1).await;
        tx.send(answer.to_string()).await.unwrap();
    }
    task.await.unwrap().unwrap();

    assert_eq!(speech.spoken(), vec!["a", "b", "a"]);
}

#[tokio::test(start_paused = true)]
async fn test_word_builder_graduates_only_clean_words() {
    let list = words(&["cat", "dog", "owl"]);
    let storage = Arc::new(MemoryStorage::new(list.clone()));
    let runner = SessionRunner::new(WordBuilder, list, storage.clone()).unwrap();
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    let outcomes = [Outcome::Correct, Outcome::Mistake, Outcome::Incorrect, Outcome::Correct];
    let mut order = Vec::new();
    for (n, outcome) in outcomes.into_iter().enumerate() {
        order.push(presented(&mut states, n + 1).await.to_string());
        tx.send(outcome).await.unwrap();
    }

    let report = task.await.unwrap().unwrap();
    assert_eq!(order, vec!["cat", "dog", "owl", "owl"]);
    assert_eq!(ids(&report.correct), vec!["cat"]);
    assert_eq!(ids(&report.incorrect), vec!["dog", "owl"]);

    let graduated = Status::NEW.add(StatusFlag::WordBuilder);
    let status_of = |id: &str| storage.get(&WordId::from(id)).unwrap().unwrap().status;
    assert_eq!(status_of("cat"), graduated);
    assert_eq!(status_of("dog"), Status::NEW);
    assert_eq!(status_of("owl"), Status::NEW);
}

fn correct_choice(states: &watch::Receiver<DrillSession<RepetitionWord>>) -> usize {
    let state = states.borrow();
    let word = state.current().unwrap();
    word.choices.iter().position(|c| c.correct).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_repetition_timeout_requeues_and_clears_flag() {
    let seen = Status::NEW.add(StatusFlag::Repetition).add(StatusFlag::Listening);
    let records = vec![
        word_with_status("a", seen),
        word_with_status("b", seen),
        word_with_status("c", seen),
    ];
    let storage = Arc::new(MemoryStorage::new(records.clone()));
    let list = RepetitionWord::with_choices(records, 1, &mut StdRng::seed_from_u64(9));

    let runner = SessionRunner::new(Repetition::default(), list, storage.clone()).unwrap();
    let mut states = runner.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let task = tokio::spawn(runner.run(rx));

    assert_eq!(presented(&mut states, 1).await.to_string(), "a");
    let answered = tokio::time::Instant::now();
    tx.send(RepetitionAnswer::timed_out(Duration::from_millis(4000)))
        .await
        .unwrap();
    assert_eq!(presented(&mut states, 2).await.to_string(), "b");
    assert_eq!(answered.elapsed(), Duration::from_millis(1000));

    let answered = tokio::time::Instant::now();
    let pick = correct_choice(&states);
    tx.send(RepetitionAnswer::picked(pick, Duration::from_millis(800)))
        .await
        .unwrap();
    assert_eq!(presented(&mut states, 3).await.to_string(), "c");
    assert_eq!(answered.elapsed(), Duration::from_millis(1000));

    let pick = correct_choice(&states);
    tx.send(RepetitionAnswer::picked(pick, Duration::from_millis(4500)))
        .await
        .unwrap();
    assert_eq!(presented(&mut states, 4).await.to_string(), "a");
    let pick = correct_choice(&states);
    tx.send(RepetitionAnswer::picked(pick, Duration::from_millis(300)))
        .await
        .unwrap();
    assert_eq!(presented(&mut states, 5).await.to_string(), "c");
    let pick = correct_choice(&states);
    tx.send(RepetitionAnswer::picked(pick, Duration::from_millis(300)))
        .await
        .unwrap();

    let report = task.await.unwrap().unwrap();
    let records = |list: &[RepetitionWord]| -> Vec<_> { list.iter().map(|w| w.record.clone()).collect() };
    assert_eq!(ids(&records(&report.correct)), vec!["b"]);
    assert_eq!(ids(&records(&report.incorrect)), vec!["a", "c"]);
    assert_eq!(report.presentations, 5);

    let status_of = |id: &str| storage.get(&WordId::from(id)).unwrap().unwrap().status;
    assert_eq!(status_of("a"), Status::NEW.add(StatusFlag::Listening));
    assert_eq!(status_of("b"), seen);
    assert_eq!(status_of("c"), Status::NEW.add(StatusFlag::Listening));
}

#[test]
fn test_runner_rejects_empty_word_list() {
    let storage = Arc::new(MemoryStorage::default());
    let result = SessionRunner::new(Listening, Vec::new(), storage);
    assert!(matches!(result, Err(DrillError::EmptySession)));
}


use semantle_types::{GameError, SessionStatus};
use std::time::Duration;
use test_helpers::*;
use uuid::Uuid;

#[tokio::test]
async fn test_daily_session_uses_word_of_the_day() {
    let setup = TestGameServerSetup::new();

    let session = setup.create_daily_session("2024-01-01");
    assert_eq!(session.target_word, "cat");
    assert!(session.is_daily);
    assert!(session.attempts.is_empty());
    assert!(!session.is_completed);

    let again = setup.create_daily_session("2024-01-01");
    assert_eq!(again.target_word, session.target_word);
    assert_ne!(again.session_id, session.session_id);
}

#[tokio::test]
async fn test_random_session_draws_from_pool() {
    let setup = TestGameServerSetup::new();

    for _ in 0..20 {
        let session = setup.game_manager.create_session(false);
        assert!(setup.game_manager.word_pool().contains(&session.target_word));
        assert!(!session.is_daily);
    }
    assert_eq!(setup.game_manager.session_count(), 20);
}

#[tokio::test]
async fn test_empty_pool_uses_fallback_word() {
    let setup = TestGameServerSetup::with_words(&[]);

    let daily = setup.game_manager.create_session(true);
    let random = setup.game_manager.create_session(false);
    assert_eq!(daily.target_word, "example");
    assert_eq!(random.target_word, "example");
}

#[tokio::test]
async fn test_correct_guess_scenario() {
    let setup = TestGameServerSetup::new();
    let session = setup.create_daily_session("2024-01-01");

    let result = setup.guess(session.session_id, "Cat").await.unwrap();
    assert!(result.is_correct);
    assert_eq!(result.similarity, 1.0);
    assert_eq!(result.rank, 0);
    assert_eq!(result.attempts, 1);

    let state = setup
        .game_manager
        .get_session(session.session_id)
        .await
        .unwrap();
    assert_eq!(state.status(), SessionStatus::Completed);
}

#[tokio::test]
async fn test_wrong_guess_scenario() {
    let setup = TestGameServerSetup::new();
    let session = setup.create_daily_session("2024-01-02");
    assert_eq!(session.target_word, "animal");

    let result = setup.guess(session.session_id, "cat").await.unwrap();
    assert!(!result.is_correct);
    assert_eq!(result.rank, 1);
    assert!(result.similarity >= 0.0 && result.similarity < 1.0);

    let state = setup
        .game_manager
        .get_session(session.session_id)
        .await
        .unwrap();
    assert_eq!(state.status(), SessionStatus::Active);
    assert_eq!(state.attempts[0].word, "cat");
    assert!((state.attempts[0].similarity - result.similarity).abs() < 1e-6);
}

#[tokio::test]
async fn test_negative_similarity_clamped_to_zero() {
    let setup = TestGameServerSetup::new();
    let session = setup.create_daily_session("2024-01-01");

    let result = setup.guess(session.session_id, "opposite").await.unwrap();
    assert_eq!(result.similarity, 0.0);
}

#[tokio::test]
async fn test_unknown_session() {
    let setup = TestGameServerSetup::new();
    let missing = Uuid::new_v4();

    let result = setup.guess(missing, "cat").await;
    assert_eq!(
        result,
        Err(GameError::SessionNotFound {
            session_id: missing.to_string()
        })
    );
    assert!(setup.game_manager.get_session(missing).await.is_none());
}

#[tokio::test]
async fn test_guess_after_completion_rejected() {
    let setup = TestGameServerSetup::new();
    let session = setup.create_daily_session("2024-01-01");
    setup.guess(session.session_id, "cat").await.unwrap();

    let result = setup.guess(session.session_id, "dog").await;
    assert_eq!(result, Err(GameError::GameAlreadyCompleted));
    assert_eq!(setup.attempt_count(session.session_id).await, 1);
}

#[tokio::test]
async fn test_invalid_words_rejected() {
    let setup = TestGameServerSetup::new();
    let session = setup.create_daily_session("2024-01-01");

    for word in ["", "   ", "qwzxv"] {
        let result = setup.guess(session.session_id, word).await;
        assert!(
            matches!(result, Err(GameError::InvalidWord { .. })),
            "expected '{word}' to be invalid"
        );
    }
    assert_eq!(setup.attempt_count(session.session_id).await, 0);
}

#[tokio::test]
async fn test_duplicate_guess_rejected() {
    let setup = TestGameServerSetup::new();
    let session = setup.create_daily_session("2024-01-02");

    setup.guess(session.session_id, "dog").await.unwrap();
    let result = setup.guess(session.session_id, "  DOG").await;

    assert_eq!(
        result,
        Err(GameError::WordAlreadyGuessed {
            word: "dog".to_string()
        })
    );
    assert_eq!(setup.attempt_count(session.session_id).await, 1);
}

#[tokio::test]
async fn test_attempts_keep_guess_order() {
    let setup = TestGameServerSetup::new();
    let session = setup.create_daily_session("2024-01-02");

    for word in ["house", "river", "dog", "animal"] {
        setup.guess(session.session_id, word).await.unwrap();
    }

    let state = setup
        .game_manager
        .get_session(session.session_id)
        .await
        .unwrap();
    let words: Vec<_> = state.attempts.iter().map(|a| a.word.as_str()).collect();
    assert_eq!(words, ["house", "river", "dog", "animal"]);
    assert!(state.is_completed);
    assert!(state.attempts.iter().take(3).all(|a| !a.is_correct && a.rank == 1));
}

#[tokio::test]
async fn test_unembeddable_target_reports_provider_failure() {
    let setup = TestGameServerSetup::with_words(&["zzyzx"]);
    let session = setup.game_manager.create_session(true);
    assert_eq!(session.target_word, "zzyzx");

    let result = setup.guess(session.session_id, "cat").await;
    assert!(matches!(result, Err(GameError::EmbeddingUnavailable { .. })));
    assert_eq!(setup.attempt_count(session.session_id).await, 0);

    // The target fails validation as well, so this session cannot be won
    let result = setup.guess(session.session_id, "zzyzx").await;
    assert!(matches!(result, Err(GameError::InvalidWord { .. })));
}

#[tokio::test]
async fn test_embeddings_are_cached_across_sessions() {
    let setup = TestGameServerSetup::new();
    let first = setup.create_daily_session("2024-01-02");
    let second = setup.create_daily_session("2024-01-02");

    setup.guess(first.session_id, "dog").await.unwrap();
    let calls = setup.provider.calls();
    setup.guess(second.session_id, "DOG").await.unwrap();

    assert_eq!(setup.provider.calls(), calls);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_guesses_record_once() {
    let setup = TestGameServerSetup::with_provider(
        &["cat", "dog", "animal"],
        FakeEmbeddingProvider::new().with_delay(Duration::from_millis(20)),
    );
    let session = setup.create_daily_session("2024-01-02");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let game_manager = setup.game_manager.clone();
        let session_id = session.session_id;
        handles.push(tokio::spawn(async move {
            game_manager.submit_guess(session_id, "dog").await
        }));
    }

    let mut accepted = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(GameError::WordAlreadyGuessed { .. }) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(setup.attempt_count(session.session_id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_winning_guesses_complete_once() {
    let setup = TestGameServerSetup::with_provider(
        &["cat", "dog", "animal"],
        FakeEmbeddingProvider::new().with_delay(Duration::from_millis(20)),
    );
    let session = setup.create_daily_session("2024-01-01");

    let mut handles = Vec::new();
    for _ in 0..4 {
        let game_manager = setup.game_manager.clone();
        let session_id = session.session_id;
        handles.push(tokio::spawn(async move {
            game_manager.submit_guess(session_id, "cat").await
        }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(result) => {
                assert!(result.is_correct);
                wins += 1;
            }
            Err(e) => assert_eq!(e, GameError::GameAlreadyCompleted),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(setup.attempt_count(session.session_id).await, 1);
}

#[tokio::test]
async fn test_cleanup_expired_sessions() {
    let setup = TestGameServerSetup::new();
    let session = setup.game_manager.create_session(false);
    setup.game_manager.create_session(true);

    assert_eq!(
        setup
            .game_manager
            .cleanup_expired_sessions(Duration::from_secs(3600)),
        0
    );
    assert_eq!(setup.game_manager.session_count(), 2);

    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(
        setup
            .game_manager
            .cleanup_expired_sessions(Duration::from_millis(1)),
        2
    );
    assert!(setup.game_manager.get_session(session.session_id).await.is_none());
}

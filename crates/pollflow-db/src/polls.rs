use crate::{DbError, DbPool};
use chrono::{DateTime, Utc};
use pollflow_models::{Poll, PollAnswer, PollOption};

#[derive(Debug, Clone, sqlx::FromRow)]
struct PollRow {
    id: String,
    question: String,
    is_text_based: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OptionRow {
    id: String,
    text: String,
    votes: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct AnswerRow {
    id: String,
    text: String,
    user_id: Option<String>,
    created_at: DateTime<Utc>,
}

/// Insert a poll together with its options in one transaction.
pub async fn insert_poll(pool: &DbPool, poll: &Poll) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO polls (id, question, is_text_based, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(&poll.id)
        .bind(&poll.question)
        .bind(poll.is_text_based)
        .bind(poll.created_at)
        .execute(&mut *tx)
        .await?;

    for (position, option) in poll.options.iter().enumerate() {
        sqlx::query(
            "INSERT INTO poll_options (poll_id, id, position, text, votes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&poll.id)
        .bind(&option.id)
        .bind(position as i64)
        .bind(&option.text)
        .bind(option.votes)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn get_poll(pool: &DbPool, id: &str) -> Result<Poll, DbError> {
    let row = sqlx::query_as::<_, PollRow>(
        "SELECT id, question, is_text_based, created_at FROM polls WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    assemble(pool, row).await
}

pub async fn list_polls(pool: &DbPool) -> Result<Vec<Poll>, DbError> {
    let rows = sqlx::query_as::<_, PollRow>(
        "SELECT id, question, is_text_based, created_at FROM polls ORDER BY created_at, id",
    )
    .fetch_all(pool)
    .await?;

    let mut polls = Vec::with_capacity(rows.len());
    for row in rows {
        polls.push(assemble(pool, row).await?);
    }
    Ok(polls)
}

/// Increment one option's vote count by exactly 1. `NotFound` if the option
/// does not belong to the poll (or either is absent); no counts change then.
pub async fn cast_vote(pool: &DbPool, poll_id: &str, option_id: &str) -> Result<Poll, DbError> {
    let updated = sqlx::query("UPDATE poll_options SET votes = votes + 1 WHERE poll_id = ?1 AND id = ?2")
        .bind(poll_id)
        .bind(option_id)
        .execute(pool)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    get_poll(pool, poll_id).await
}

/// Append an answer to a text poll. The guarded insert keeps this a single
/// statement so a concurrently deleted poll cannot leave an orphan row.
pub async fn add_answer(pool: &DbPool, poll_id: &str, answer: &PollAnswer) -> Result<Poll, DbError> {
    let inserted = sqlx::query(
        "INSERT INTO poll_answers (poll_id, id, text, user_id, created_at)
         SELECT ?1, ?2, ?3, ?4, ?5
         WHERE EXISTS (SELECT 1 FROM polls WHERE id = ?1)",
    )
    .bind(poll_id)
    .bind(&answer.id)
    .bind(&answer.text)
    .bind(&answer.user_id)
    .bind(answer.created_at)
    .execute(pool)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    get_poll(pool, poll_id).await
}

async fn assemble(pool: &DbPool, row: PollRow) -> Result<Poll, DbError> {
    let options = sqlx::query_as::<_, OptionRow>(
        "SELECT id, text, votes FROM poll_options WHERE poll_id = ?1 ORDER BY position",
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    let answers = sqlx::query_as::<_, AnswerRow>(
        "SELECT id, text, user_id, created_at FROM poll_answers
         WHERE poll_id = ?1 ORDER BY created_at, id",
    )
    .bind(&row.id)
    .fetch_all(pool)
    .await?;

    Ok(Poll {
        id: row.id,
        question: row.question,
        options: options
            .into_iter()
            .map(|o| PollOption {
                id: o.id,
                text: o.text,
                votes: o.votes,
            })
            .collect(),
        answers: answers
            .into_iter()
            .map(|a| PollAnswer {
                id: a.id,
                text: a.text,
                user_id: a.user_id,
                created_at: a.created_at,
            })
            .collect(),
        is_text_based: row.is_text_based,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DbPool {
        let pool = crate::create_pool("sqlite::memory:", 1).await.unwrap();
        crate::run_migrations(&pool).await.unwrap();
        pool
    }

    fn sample_poll(id: &str, options: &[(&str, &str)]) -> Poll {
        Poll {
            id: id.to_string(),
            question: "Coffee or tea?".to_string(),
            options: options
                .iter()
                .map(|(option_id, text)| PollOption {
                    id: option_id.to_string(),
                    text: text.to_string(),
                    votes: 0,
                })
                .collect(),
            answers: Vec::new(),
            is_text_based: false,
            created_at: Utc::now(),
        }
    }

    fn sample_answer(id: &str, text: &str) -> PollAnswer {
        PollAnswer {
            id: id.to_string(),
            text: text.to_string(),
            user_id: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let pool = test_pool().await;
        let poll = sample_poll("p1", &[("o1", "Coffee"), ("o2", "Tea")]);
        insert_poll(&pool, &poll).await.unwrap();

        let fetched = get_poll(&pool, "p1").await.unwrap();
        assert_eq!(fetched.question, "Coffee or tea?");
        assert!(!fetched.is_text_based);
        assert_eq!(fetched.options.len(), 2);
        assert_eq!(fetched.options[0].text, "Coffee");
        assert_eq!(fetched.options[1].text, "Tea");
        assert!(fetched.options.iter().all(|o| o.votes == 0));
        assert!(fetched.answers.is_empty());
    }

    #[tokio::test]
    async fn get_unknown_poll_is_not_found() {
        let pool = test_pool().await;
        assert!(matches!(
            get_poll(&pool, "missing").await,
            Err(DbError::NotFound)
        ));
    }

    #[tokio::test]
    async fn cast_vote_increments_exactly_one_option() {
        let pool = test_pool().await;
        insert_poll(&pool, &sample_poll("p1", &[("o1", "Coffee"), ("o2", "Tea")]))
            .await
            .unwrap();

        let updated = cast_vote(&pool, "p1", "o1").await.unwrap();
        assert_eq!(updated.options[0].votes, 1);
        assert_eq!(updated.options[1].votes, 0);

        let updated = cast_vote(&pool, "p1", "o1").await.unwrap();
        assert_eq!(updated.options[0].votes, 2);
    }

    #[tokio::test]
    async fn cast_vote_on_unknown_option_changes_nothing() {
        let pool = test_pool().await;
        insert_poll(&pool, &sample_poll("p1", &[("o1", "Coffee"), ("o2", "Tea")]))
            .await
            .unwrap();

        assert!(matches!(
            cast_vote(&pool, "p1", "bogus").await,
            Err(DbError::NotFound)
        ));
        assert!(matches!(
            cast_vote(&pool, "bogus", "o1").await,
            Err(DbError::NotFound)
        ));

        let poll = get_poll(&pool, "p1").await.unwrap();
        assert!(poll.options.iter().all(|o| o.votes == 0));
    }

    #[tokio::test]
    async fn option_id_is_scoped_to_its_poll() {
        let pool = test_pool().await;
        insert_poll(&pool, &sample_poll("p1", &[("o1", "Coffee"), ("o2", "Tea")]))
            .await
            .unwrap();
        insert_poll(&pool, &sample_poll("p2", &[("o1", "Yes"), ("o2", "No")]))
            .await
            .unwrap();

        cast_vote(&pool, "p1", "o1").await.unwrap();

        let other = get_poll(&pool, "p2").await.unwrap();
        assert!(other.options.iter().all(|o| o.votes == 0));
    }

    #[tokio::test]
    async fn add_answer_always_appends() {
        let pool = test_pool().await;
        let mut poll = sample_poll("p1", &[]);
        poll.is_text_based = true;
        insert_poll(&pool, &poll).await.unwrap();

        let updated = add_answer(&pool, "p1", &sample_answer("a1", "first"))
            .await
            .unwrap();
        assert_eq!(updated.answers.len(), 1);

        let updated = add_answer(&pool, "p1", &sample_answer("a2", "second"))
            .await
            .unwrap();
        assert_eq!(updated.answers.len(), 2);
        assert_eq!(updated.answers[0].text, "first");
        assert_eq!(updated.answers[1].text, "second");
    }

    #[tokio::test]
    async fn add_answer_to_unknown_poll_is_not_found() {
        let pool = test_pool().await;
        assert!(matches!(
            add_answer(&pool, "missing", &sample_answer("a1", "text")).await,
            Err(DbError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_polls_orders_by_creation() {
        let pool = test_pool().await;
        let mut first = sample_poll("p1", &[("o1", "A"), ("o2", "B")]);
        first.created_at = Utc::now() - chrono::Duration::minutes(5);
        let second = sample_poll("p2", &[("o1", "C"), ("o2", "D")]);
        insert_poll(&pool, &second).await.unwrap();
        insert_poll(&pool, &first).await.unwrap();

        let polls = list_polls(&pool).await.unwrap();
        assert_eq!(polls.len(), 2);
        assert_eq!(polls[0].id, "p1");
        assert_eq!(polls[1].id, "p2");
    }
}

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    AttendanceChange, AttendanceRecord, Class, FeedbackForm, FeedbackResponse,
    NewClassRequest, NewFeedbackFormRequest, NewFeedbackResponseRequest, NewStudentRequest,
    Notification, Student, TuitionChange, UpdateClassRequest, TUITION_DATE_KEY,
};

// ---------------------------------------------------------------------------
// Classes

pub async fn fetch_classes(db: &SqlitePool) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(
        "SELECT id, name, schedule_text, duration_minutes, online_until, created_at, updated_at
         FROM classes ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_class_by_id(db: &SqlitePool, id: &str) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(
        "SELECT id, name, schedule_text, duration_minutes, online_until, created_at, updated_at
         FROM classes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_class(db: &SqlitePool, req: NewClassRequest) -> Result<Class, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO classes (id, name, schedule_text, duration_minutes, online_until, created_at, updated_at)
         VALUES (?, ?, ?, ?, NULL, ?, ?)",
    )
    .bind(&id)
    .bind(&req.name)
    .bind(&req.schedule_text)
    .bind(req.duration_minutes)
    .bind(&now)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Class {
        id,
        name: req.name,
        schedule_text: req.schedule_text,
        duration_minutes: req.duration_minutes,
        online_until: None,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn update_class(
    db: &SqlitePool,
    id: &str,
    req: UpdateClassRequest,
) -> Result<Option<Class>, sqlx::Error> {
    let mut current = match find_class_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(name) = req.name {
        current.name = name;
    }
    if let Some(schedule_text) = req.schedule_text {
        current.schedule_text = schedule_text;
    }
    if let Some(duration_minutes) = req.duration_minutes {
        current.duration_minutes = duration_minutes;
    }
    current.updated_at = Utc::now().to_rfc3339();

    sqlx::query(
        "UPDATE classes SET name = ?, schedule_text = ?, duration_minutes = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&current.name)
    .bind(&current.schedule_text)
    .bind(current.duration_minutes)
    .bind(&current.updated_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

/// Deletes a class and everything hanging off it. Children are removed
/// explicitly rather than relying on the foreign-key pragma being on.
pub async fn delete_class(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query(
        "DELETE FROM feedback_responses WHERE form_id IN
         (SELECT id FROM feedback_forms WHERE class_id = ?)",
    )
    .bind(id)
    .execute(db)
    .await?;
    sqlx::query("DELETE FROM feedback_forms WHERE class_id = ?")
        .bind(id)
        .execute(db)
        .await?;
    sqlx::query("DELETE FROM attendance_records WHERE class_id = ?")
        .bind(id)
        .execute(db)
        .await?;
    sqlx::query("DELETE FROM class_students WHERE class_id = ?")
        .bind(id)
        .execute(db)
        .await?;

    let result = sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Marks the class as holding an online session right now. The flag
/// expires `duration_minutes - 15` minutes after the ping.
pub async fn ping_class(db: &SqlitePool, id: &str) -> Result<Option<Class>, sqlx::Error> {
    let current = match find_class_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    let ttl_minutes = (current.duration_minutes - 15).max(0);
    let until = (Utc::now() + Duration::minutes(ttl_minutes)).to_rfc3339();

    sqlx::query("UPDATE classes SET online_until = ? WHERE id = ?")
        .bind(&until)
        .bind(id)
        .execute(db)
        .await?;

    Ok(Some(Class {
        online_until: Some(until),
        ..current
    }))
}

// ---------------------------------------------------------------------------
// Students & roster

pub async fn fetch_students(db: &SqlitePool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT id, name, created_at FROM students ORDER BY name")
        .fetch_all(db)
        .await
}

pub async fn find_student_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT id, name, created_at FROM students WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_student(
    db: &SqlitePool,
    req: NewStudentRequest,
) -> Result<Student, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO students (id, name, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(&req.name)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(Student {
        id,
        name: req.name,
        created_at: now,
    })
}

/// Appends the student to the class roster. Enrolling twice is a no-op.
pub async fn enroll_student(
    db: &SqlitePool,
    class_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO class_students (class_id, student_id, position)
         VALUES (?, ?, (SELECT COALESCE(MAX(position) + 1, 0) FROM class_students WHERE class_id = ?))",
    )
    .bind(class_id)
    .bind(student_id)
    .bind(class_id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn unenroll_student(
    db: &SqlitePool,
    class_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM class_students WHERE class_id = ? AND student_id = ?")
        .bind(class_id)
        .bind(student_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

/// Roster in enrollment order.
pub async fn fetch_roster(db: &SqlitePool, class_id: &str) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT s.id, s.name, s.created_at
         FROM class_students cs JOIN students s ON s.id = cs.student_id
         WHERE cs.class_id = ?
         ORDER BY cs.position",
    )
    .bind(class_id)
    .fetch_all(db)
    .await
}

// ---------------------------------------------------------------------------
// Attendance store

const RECORD_COLUMNS: &str = "student_id, date_key, attendance, homework, tuition";

/// Fetches the sparse records for the given date keys in one query. The
/// tuition sentinel key is always included alongside whatever the caller
/// asked for, so the per-student tuition flag rides along for free.
pub async fn fetch_attendance(
    db: &SqlitePool,
    class_id: &str,
    date_keys: &[String],
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let placeholders = vec!["?"; date_keys.len() + 1].join(", ");
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance_records
         WHERE class_id = ? AND date_key IN ({placeholders})
         ORDER BY student_id, date_key"
    );

    let mut query = sqlx::query_as::<_, AttendanceRecord>(&sql).bind(class_id);
    for key in date_keys {
        query = query.bind(key);
    }
    query = query.bind(TUITION_DATE_KEY);

    query.fetch_all(db).await
}

/// Range variant: every record whose date key sorts between `from` and
/// `to` (ISO dates sort lexically), plus the sentinel.
pub async fn fetch_attendance_range(
    db: &SqlitePool,
    class_id: &str,
    from: &str,
    to: &str,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance_records
         WHERE class_id = ? AND (date_key BETWEEN ? AND ? OR date_key = ?)
         ORDER BY student_id, date_key"
    );

    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(class_id)
        .bind(from)
        .bind(to)
        .bind(TUITION_DATE_KEY)
        .fetch_all(db)
        .await
}

/// Applies a batch of attendance/homework and tuition changes as
/// independent per-key upserts.
///
/// Each row is its own `INSERT .. ON CONFLICT DO UPDATE`, with the SET
/// clause limited to the fields the change actually carries, so a
/// homework-only change never clobbers a previously written attendance
/// flag. Rows missing a student id or date key are skipped, not
/// rejected. There is deliberately no wrapping transaction: a crash
/// mid-batch leaves a consistent prefix, and retrying the full batch is
/// safe because every upsert is idempotent. The unique index on
/// (class_id, student_id, date_key) is what keeps concurrent creates of
/// the same key from ever producing duplicate rows.
pub async fn bulk_upsert_attendance(
    db: &SqlitePool,
    class_id: &str,
    changes: &[AttendanceChange],
    tuition_changes: &[TuitionChange],
) -> Result<usize, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let mut saved = 0usize;

    for change in changes {
        let (student_id, date_key) = match (&change.student_id, &change.date_key) {
            (Some(s), Some(d)) => (s, d),
            _ => continue,
        };
        // Per-date changes never touch the tuition sentinel row.
        if date_key == TUITION_DATE_KEY {
            continue;
        }

        let set_clause = match (change.attendance.is_some(), change.homework.is_some()) {
            (true, true) => {
                "attendance = excluded.attendance, homework = excluded.homework,
                 updated_at = excluded.updated_at"
            }
            (true, false) => "attendance = excluded.attendance, updated_at = excluded.updated_at",
            (false, true) => "homework = excluded.homework, updated_at = excluded.updated_at",
            // Nothing to update on an existing row; still creates the
            // all-false record if none exists.
            (false, false) => "",
        };
        let sql = if set_clause.is_empty() {
            "INSERT INTO attendance_records
                 (id, class_id, student_id, date_key, attendance, homework, tuition, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?)
             ON CONFLICT (class_id, student_id, date_key) DO NOTHING"
                .to_string()
        } else {
            format!(
                "INSERT INTO attendance_records
                     (id, class_id, student_id, date_key, attendance, homework, tuition, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, 0, ?)
                 ON CONFLICT (class_id, student_id, date_key) DO UPDATE SET {set_clause}"
            )
        };

        sqlx::query(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(class_id)
            .bind(student_id)
            .bind(date_key)
            .bind(change.attendance.unwrap_or(false))
            .bind(change.homework.unwrap_or(false))
            .bind(&now)
            .execute(db)
            .await?;
        saved += 1;
    }

    for change in tuition_changes {
        let (student_id, tuition) = match (&change.student_id, change.tuition) {
            (Some(s), Some(t)) => (s, t),
            _ => continue,
        };

        sqlx::query(
            "INSERT INTO attendance_records
                 (id, class_id, student_id, date_key, attendance, homework, tuition, updated_at)
             VALUES (?, ?, ?, ?, 0, 0, ?, ?)
             ON CONFLICT (class_id, student_id, date_key) DO UPDATE SET
                 tuition = excluded.tuition, updated_at = excluded.updated_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(class_id)
        .bind(student_id)
        .bind(TUITION_DATE_KEY)
        .bind(tuition)
        .bind(&now)
        .execute(db)
        .await?;
        saved += 1;
    }

    Ok(saved)
}

// ---------------------------------------------------------------------------
// Feedback

pub async fn insert_feedback_form(
    db: &SqlitePool,
    class_id: &str,
    req: NewFeedbackFormRequest,
) -> Result<FeedbackForm, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query("INSERT INTO feedback_forms (id, class_id, title, created_at) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(class_id)
        .bind(&req.title)
        .bind(&now)
        .execute(db)
        .await?;

    Ok(FeedbackForm {
        id,
        class_id: class_id.to_string(),
        title: req.title,
        created_at: now,
    })
}

pub async fn find_feedback_form(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<FeedbackForm>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackForm>(
        "SELECT id, class_id, title, created_at FROM feedback_forms WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_feedback_response(
    db: &SqlitePool,
    form_id: &str,
    req: NewFeedbackResponseRequest,
) -> Result<FeedbackResponse, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO feedback_responses (id, form_id, student_name, rating, comment, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(form_id)
    .bind(&req.student_name)
    .bind(req.rating)
    .bind(&req.comment)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(FeedbackResponse {
        id,
        form_id: form_id.to_string(),
        student_name: req.student_name,
        rating: req.rating,
        comment: req.comment,
        created_at: now,
    })
}

pub async fn fetch_feedback_responses(
    db: &SqlitePool,
    form_id: &str,
) -> Result<Vec<FeedbackResponse>, sqlx::Error> {
    sqlx::query_as::<_, FeedbackResponse>(
        "SELECT id, form_id, student_name, rating, comment, created_at
         FROM feedback_responses WHERE form_id = ? ORDER BY created_at DESC",
    )
    .bind(form_id)
    .fetch_all(db)
    .await
}

// ---------------------------------------------------------------------------
// Notifications

pub async fn insert_notification(
    db: &SqlitePool,
    class_id: Option<&str>,
    kind: &str,
    message: &str,
) -> Result<Notification, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO notifications (id, class_id, kind, message, is_read, created_at)
         VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(&id)
    .bind(class_id)
    .bind(kind)
    .bind(message)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Notification {
        id,
        class_id: class_id.map(str::to_string),
        kind: kind.to_string(),
        message: message.to_string(),
        is_read: false,
        created_at: now,
    })
}

pub async fn fetch_notifications(db: &SqlitePool) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        "SELECT id, class_id, kind, message, is_read, created_at
         FROM notifications ORDER BY created_at DESC",
    )
    .fetch_all(db)
    .await
}

pub async fn mark_notification_read(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

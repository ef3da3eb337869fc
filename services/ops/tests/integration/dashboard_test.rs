use chrono::TimeDelta;

use devsuite_ops::domain::types::{Notification, NotificationRequest};
use devsuite_ops::usecase::dashboard::NotificationDashboardUseCase;

use crate::helpers::{MockNotificationRepo, now, today};

fn notification(minutes_ago: i64, sent: bool) -> Notification {
    let created = now() - TimeDelta::minutes(minutes_ago);
    let mut n = Notification::pending(
        NotificationRequest::new("ops@acme.test", format!("#{minutes_ago}"), "", None),
        created,
        today(),
    );
    if sent {
        n.mark_sent(created);
    } else {
        n.mark_failed(created);
    }
    n
}

#[tokio::test]
async fn should_count_notifications_by_status() {
    let uc = NotificationDashboardUseCase {
        repo: MockNotificationRepo::new(vec![
            notification(1, true),
            notification(2, true),
            notification(3, false),
        ]),
    };

    let summary = uc.execute(None).await.unwrap();

    assert_eq!(summary.counts.sent, 2);
    assert_eq!(summary.counts.failed, 1);
    assert_eq!(summary.counts.pending, 0);
    assert_eq!(summary.counts.total(), 3);
}

#[tokio::test]
async fn should_list_newest_first_up_to_default_limit() {
    let all = (0..12).map(|i| notification(i, true)).collect();
    let uc = NotificationDashboardUseCase {
        repo: MockNotificationRepo::new(all),
    };

    let summary = uc.execute(None).await.unwrap();

    assert_eq!(summary.recent.len(), 10);
    assert_eq!(summary.recent[0].subject, "#0");
    assert_eq!(summary.recent[9].subject, "#9");
}

#[tokio::test]
async fn should_honour_explicit_limit() {
    let all = (0..5).map(|i| notification(i, false)).collect();
    let uc = NotificationDashboardUseCase {
        repo: MockNotificationRepo::new(all),
    };

    let summary = uc.execute(Some(2)).await.unwrap();

    assert_eq!(summary.recent.len(), 2);
    assert_eq!(summary.counts.failed, 5);
}

use super::common::*;
use crate::applications::{
    ApplicationKey, ApplicationLifecycle, ApplicationStatus, LifecycleError, ReapplyPolicy,
    APPLICATIONS_COLLECTION,
};
use crate::store::StoreError;
use std::sync::Arc;

#[test]
fn apply_creates_applied_record_under_composite_key() {
    let (lifecycle, store) = build_lifecycle();

    let application = lifecycle
        .apply(OPPORTUNITY, STUDENT, ORG)
        .expect("apply succeeds");

    assert_eq!(application.key, ApplicationKey::new(OPPORTUNITY, STUDENT));
    assert_eq!(application.key.as_str(), "opp-42_stu-7");
    assert_eq!(application.status, ApplicationStatus::Applied);
    assert_eq!(application.org_id, ORG);
    assert_eq!(application.created_at, application.updated_at);
    assert_eq!(store.record_count(APPLICATIONS_COLLECTION), 1);
}

#[test]
fn repeated_apply_keeps_one_record_and_creation_time() {
    let (lifecycle, store) = build_lifecycle();

    let first = lifecycle.apply(OPPORTUNITY, STUDENT, ORG).expect("first apply");
    let second = lifecycle.apply(OPPORTUNITY, STUDENT, ORG).expect("second apply");

    assert_eq!(store.record_count(APPLICATIONS_COLLECTION), 1);
    assert_eq!(second.status, ApplicationStatus::Applied);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
}

#[test]
fn apply_never_downgrades_advanced_statuses() {
    for advanced in [ApplicationStatus::Shortlisted, ApplicationStatus::Contacted] {
        let (lifecycle, _) = build_lifecycle();
        lifecycle.apply(OPPORTUNITY, STUDENT, ORG).expect("apply");
        let reviewed = lifecycle
            .set_status(OPPORTUNITY, STUDENT, advanced, None)
            .expect("reviewer update");

        let again = lifecycle
            .apply(OPPORTUNITY, STUDENT, ORG)
            .expect("re-apply succeeds");

        assert_eq!(again.status, advanced);
        assert_eq!(again.updated_at, reviewed.updated_at);
    }
}

#[test]
fn reapply_after_rejection_follows_policy() {
    let (resetting, _) = build_lifecycle_with(ReapplyPolicy::ResetToApplied);
    let original = resetting.apply(OPPORTUNITY, STUDENT, ORG).expect("apply");
    resetting.withdraw(OPPORTUNITY, STUDENT).expect("withdraw");
    let reset = resetting
        .apply(OPPORTUNITY, STUDENT, "org-other")
        .expect("re-apply");
    assert_eq!(reset.status, ApplicationStatus::Applied);
    assert_eq!(reset.created_at, original.created_at);
    assert_eq!(reset.org_id, ORG);

    let (keeping, _) = build_lifecycle_with(ReapplyPolicy::KeepExisting);
    keeping.apply(OPPORTUNITY, STUDENT, ORG).expect("apply");
    let rejected = keeping.withdraw(OPPORTUNITY, STUDENT).expect("withdraw");
    let kept = keeping.apply(OPPORTUNITY, STUDENT, ORG).expect("re-apply");
    assert_eq!(kept, rejected);
}

#[test]
fn reviewer_may_move_between_any_statuses() {
    let (lifecycle, store) = build_lifecycle();
    lifecycle.apply(OPPORTUNITY, STUDENT, ORG).expect("apply");

    for status in [
        ApplicationStatus::Contacted,
        ApplicationStatus::Applied,
        ApplicationStatus::Rejected,
        ApplicationStatus::Shortlisted,
    ] {
        let updated = lifecycle
            .set_status(OPPORTUNITY, STUDENT, status, None)
            .expect("status change accepted");
        assert_eq!(updated.status, status);
        assert_eq!(updated.org_id, ORG);
    }
    assert_eq!(store.record_count(APPLICATIONS_COLLECTION), 1);
}

#[test]
fn set_status_creates_missing_record_when_owner_supplied() {
    let (lifecycle, _) = build_lifecycle();

    let created = lifecycle
        .set_status(OPPORTUNITY, STUDENT, ApplicationStatus::Shortlisted, Some(ORG))
        .expect("creation with owner");

    assert_eq!(created.status, ApplicationStatus::Shortlisted);
    assert_eq!(created.org_id, ORG);
}

#[test]
fn set_status_without_owner_on_missing_record_fails() {
    let (lifecycle, store) = build_lifecycle();

    for owner in [None, Some(""), Some("   ")] {
        match lifecycle.set_status(OPPORTUNITY, STUDENT, ApplicationStatus::Contacted, owner) {
            Err(LifecycleError::MissingOwner { key }) => {
                assert_eq!(key, ApplicationKey::new(OPPORTUNITY, STUDENT))
            }
            other => panic!("expected missing owner, got {other:?}"),
        }
    }
    assert_eq!(store.record_count(APPLICATIONS_COLLECTION), 0);
}

#[test]
fn withdraw_marks_rejected_and_requires_existing_record() {
    let (lifecycle, store) = build_lifecycle();

    assert!(matches!(
        lifecycle.withdraw(OPPORTUNITY, STUDENT),
        Err(LifecycleError::MissingOwner { .. })
    ));
    assert_eq!(store.record_count(APPLICATIONS_COLLECTION), 0);

    lifecycle.apply(OPPORTUNITY, STUDENT, ORG).expect("apply");
    let withdrawn = lifecycle.withdraw(OPPORTUNITY, STUDENT).expect("withdraw");
    assert_eq!(withdrawn.status, ApplicationStatus::Rejected);
}

#[test]
fn listings_filter_by_field() {
    let (lifecycle, _) = build_lifecycle();
    lifecycle.apply("opp-1", "stu-1", "org-a").expect("apply");
    lifecycle.apply("opp-1", "stu-2", "org-a").expect("apply");
    lifecycle.apply("opp-2", "stu-1", "org-b").expect("apply");

    let for_opportunity = lifecycle.by_opportunity("opp-1").expect("list");
    assert_eq!(for_opportunity.len(), 2);
    assert!(for_opportunity
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));

    let for_org = lifecycle.by_organization("org-b").expect("list");
    assert_eq!(for_org.len(), 1);
    assert_eq!(for_org[0].opportunity_id, "opp-2");

    let for_student = lifecycle.by_student("stu-1").expect("list");
    assert_eq!(for_student.len(), 2);
    assert!(lifecycle.by_student("stu-9").expect("list").is_empty());
}

#[test]
fn get_returns_none_for_unknown_pair() {
    let (lifecycle, _) = build_lifecycle();
    assert!(lifecycle.get(OPPORTUNITY, STUDENT).expect("get").is_none());
}

#[test]
fn store_failures_propagate_unchanged() {
    let lifecycle = ApplicationLifecycle::new(Arc::new(UnavailableStore));

    assert!(matches!(
        lifecycle.apply(OPPORTUNITY, STUDENT, ORG),
        Err(LifecycleError::Store(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        lifecycle.set_status(OPPORTUNITY, STUDENT, ApplicationStatus::Shortlisted, Some(ORG)),
        Err(LifecycleError::Store(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        lifecycle.get(OPPORTUNITY, STUDENT),
        Err(LifecycleError::Store(StoreError::Unavailable(_)))
    ));
    assert!(matches!(
        lifecycle.by_organization(ORG),
        Err(LifecycleError::Store(StoreError::Unavailable(_)))
    ));
}

#[test]
fn concurrent_apply_and_review_leave_one_record() {
    let (lifecycle, store) = build_lifecycle();
    let lifecycle = Arc::new(lifecycle);

    let handles: Vec<_> = (0..8)
        .map(|round| {
            let lifecycle = Arc::clone(&lifecycle);
            std::thread::spawn(move || {
                if round % 2 == 0 {
                    lifecycle.apply(OPPORTUNITY, STUDENT, ORG).map(|_| ())
                } else {
                    lifecycle
                        .set_status(
                            OPPORTUNITY,
                            STUDENT,
                            ApplicationStatus::Shortlisted,
                            Some(ORG),
                        )
                        .map(|_| ())
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread joins").expect("write succeeds");
    }

    assert_eq!(store.record_count(APPLICATIONS_COLLECTION), 1);
    let stored = lifecycle
        .get(OPPORTUNITY, STUDENT)
        .expect("get")
        .expect("present");
    assert_eq!(stored.org_id, ORG);
}

#[test]
fn colliding_key_never_rewrites_another_pair() {
    let (lifecycle, store) = build_lifecycle();
    let original = lifecycle.apply("opp_1", "stu", "org-A").expect("apply");

    match lifecycle.set_status("opp", "1_stu", ApplicationStatus::Rejected, Some("org-B")) {
        Err(LifecycleError::KeyCollision {
            key,
            opportunity_id,
            student_id,
        }) => {
            assert_eq!(key.as_str(), "opp_1_stu");
            assert_eq!(opportunity_id, "opp_1");
            assert_eq!(student_id, "stu");
        }
        other => panic!("expected key collision, got {other:?}"),
    }
    assert!(matches!(
        lifecycle.apply("opp", "1_stu", "org-B"),
        Err(LifecycleError::KeyCollision { .. })
    ));
    assert!(matches!(
        lifecycle.withdraw("opp", "1_stu"),
        Err(LifecycleError::KeyCollision { .. })
    ));

    let stored = lifecycle
        .get("opp_1", "stu")
        .expect("get")
        .expect("present");
    assert_eq!(stored, original);
    assert_eq!(store.record_count(APPLICATIONS_COLLECTION), 1);
}

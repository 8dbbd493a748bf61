mod common;

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

use auctionhouse_backend::entities::auction_requests::{self, ApprovalStatus};
use auctionhouse_backend::entities::auctions::{AuctionStatus, AuctionType};
use auctionhouse_backend::entities::prelude::*;
use auctionhouse_backend::services::approval::{
    self, ApproveOutcome, NewAuctionRequest, RejectOutcome,
};
use auctionhouse_backend::services::error::{CoreError, ErrorReason};

use crate::common::{hours, seed_admin, seed_user, setup_test_db, t0};

fn request_body(seller_id: i32, code: &str) -> NewAuctionRequest {
    NewAuctionRequest {
        seller_id,
        title: "Reserve lot".to_string(),
        description: Some("Sealed envelope lot".to_string()),
        starting_price: dec!(100),
        bid_increment: None,
        minimum_price: Some(dec!(500)),
        reserve_price: None,
        start_date: t0() + hours(1),
        end_date: t0() + hours(24),
        auction_code: Some(format!("AUC-{}", code)),
        participation_code: Some(format!("JOIN-{}", code)),
    }
}

/// Insert a staging row directly, bypassing the submit-time code check, to
/// model requests that raced each other into the table.
async fn seed_request(
    db: &sea_orm::DatabaseConnection,
    seller_id: i32,
    auction_code: &str,
    participation_code: &str,
) -> auction_requests::Model {
    auction_requests::ActiveModel {
        auction_code: Set(auction_code.to_string()),
        participation_code: Set(participation_code.to_string()),
        title: Set("Reserve lot".to_string()),
        description: Set(None),
        auction_type: Set(AuctionType::Reserve),
        starting_price: Set(dec!(100)),
        bid_increment: Set(dec!(10)),
        minimum_price: Set(Some(dec!(500))),
        reserve_price: Set(None),
        start_date: Set(t0() + hours(1)),
        end_date: Set(t0() + hours(24)),
        seller_id: Set(seller_id),
        approval_status: Set(ApprovalStatus::Pending),
        submitted_at: Set(t0()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert auction request")
}

fn now() -> DateTime<Utc> {
    t0()
}

#[tokio::test]
async fn test_approve_promotes_request_into_auction() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let request = approval::submit_request(&db, request_body(seller.id, "R1"), now())
        .await
        .unwrap();
    assert_eq!(request.approval_status, ApprovalStatus::Pending);

    let outcome = approval::approve_request(&db, request.id, admin.id, Some("ok".into()), now())
        .await
        .unwrap();
    let auction_id = match outcome {
        ApproveOutcome::Created { auction_id } => auction_id,
        other => panic!("expected Created, got {:?}", other),
    };

    let auction = Auctions::find_by_id(auction_id).one(&db).await.unwrap().unwrap();
    assert_eq!(auction.auction_code, "AUC-R1");
    assert_eq!(auction.participation_code, "JOIN-R1");
    assert_eq!(auction.auction_type, AuctionType::Reserve);
    assert_eq!(auction.minimum_price, Some(dec!(500)));
    assert_eq!(auction.current_bid, dec!(100));
    // Start date is an hour out, so the new auction is upcoming
    assert_eq!(auction.status, AuctionStatus::Upcoming);
    assert!(!auction.needs_approval);
    assert_eq!(auction.approval_status, Some(ApprovalStatus::Approved));
    assert_eq!(auction.reviewed_by, Some(admin.id));

    let stored = AuctionRequests::find_by_id(request.id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.approval_status, ApprovalStatus::Approved);
    assert_eq!(stored.created_auction, Some(auction_id));
    assert_eq!(stored.reviewed_by, Some(admin.id));
}

#[tokio::test]
async fn test_approve_twice_reports_already_approved() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let request = approval::submit_request(&db, request_body(seller.id, "R2"), now())
        .await
        .unwrap();
    let first = approval::approve_request(&db, request.id, admin.id, None, now())
        .await
        .unwrap();
    let auction_id = match first {
        ApproveOutcome::Created { auction_id } => auction_id,
        other => panic!("expected Created, got {:?}", other),
    };

    let second = approval::approve_request(&db, request.id, admin.id, None, now())
        .await
        .unwrap();
    assert_eq!(
        second,
        ApproveOutcome::AlreadyApproved {
            auction_id: Some(auction_id)
        }
    );

    let auctions = Auctions::find().all(&db).await.unwrap();
    assert_eq!(auctions.len(), 1);
}

#[tokio::test]
async fn test_approve_after_reject_surfaces_terminal_state() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let request = approval::submit_request(&db, request_body(seller.id, "R3"), now())
        .await
        .unwrap();
    approval::reject_request(&db, request.id, admin.id, "missing provenance".into(), now())
        .await
        .unwrap();

    let err = approval::approve_request(&db, request.id, admin.id, None, now())
        .await
        .unwrap_err();
    match err {
        CoreError::InvalidState {
            reason: ErrorReason::AlreadyRejected,
            message,
        } => assert!(message.contains("missing provenance")),
        other => panic!("expected AlreadyRejected, got {:?}", other),
    }

    // No auction was created
    assert!(Auctions::find().all(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reject_requires_notes_and_is_idempotent() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let request = approval::submit_request(&db, request_body(seller.id, "R4"), now())
        .await
        .unwrap();

    let err = approval::reject_request(&db, request.id, admin.id, "  ".into(), now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidArgument {
            reason: ErrorReason::EmptyNotes,
            ..
        }
    ));

    let first = approval::reject_request(&db, request.id, admin.id, "not eligible".into(), now())
        .await
        .unwrap();
    assert_eq!(first, RejectOutcome::Rejected);

    let again = approval::reject_request(&db, request.id, admin.id, "not eligible".into(), now())
        .await
        .unwrap();
    assert_eq!(again, RejectOutcome::AlreadyRejected);

    let stored = AuctionRequests::find_by_id(request.id).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.admin_notes, Some("not eligible".to_string()));
}

#[tokio::test]
async fn test_conflicting_requests_accept_exactly_one() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    // Two requests raced past the submit check with the same auction code
    let first = seed_request(&db, seller.id, "AUC-DUP", "JOIN-A").await;
    let second = seed_request(&db, seller.id, "AUC-DUP", "JOIN-B").await;

    let outcome = approval::approve_request(&db, first.id, admin.id, None, now())
        .await
        .unwrap();
    assert!(matches!(outcome, ApproveOutcome::Created { .. }));

    let err = approval::approve_request(&db, second.id, admin.id, None, now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Conflict {
            reason: ErrorReason::DuplicateAuctionCode,
            ..
        }
    ));

    assert_eq!(Auctions::find().all(&db).await.unwrap().len(), 1);
    let losing = AuctionRequests::find_by_id(second.id).one(&db).await.unwrap().unwrap();
    assert_eq!(losing.approval_status, ApprovalStatus::Pending);
}

#[tokio::test]
async fn test_conflicting_requests_opposite_order_participation_code() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let first = seed_request(&db, seller.id, "AUC-A", "JOIN-DUP").await;
    let second = seed_request(&db, seller.id, "AUC-B", "JOIN-DUP").await;

    // Approve the later submission first; the earlier one must lose
    let outcome = approval::approve_request(&db, second.id, admin.id, None, now())
        .await
        .unwrap();
    assert!(matches!(outcome, ApproveOutcome::Created { .. }));

    let err = approval::approve_request(&db, first.id, admin.id, None, now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Conflict {
            reason: ErrorReason::DuplicateParticipationCode,
            ..
        }
    ));
    assert_eq!(Auctions::find().all(&db).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_rejects_code_collision_with_live_auction() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let request = approval::submit_request(&db, request_body(seller.id, "TAKEN"), now())
        .await
        .unwrap();
    approval::approve_request(&db, request.id, admin.id, None, now())
        .await
        .unwrap();

    let err = approval::submit_request(&db, request_body(seller.id, "TAKEN"), now())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Conflict {
            reason: ErrorReason::DuplicateAuctionCode,
            ..
        }
    ));
}

#[tokio::test]
async fn test_replay_with_existing_auction_is_noop_success() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let request = approval::submit_request(&db, request_body(seller.id, "R5"), now())
        .await
        .unwrap();
    let outcome = approval::approve_request(&db, request.id, admin.id, None, now())
        .await
        .unwrap();
    let auction_id = match outcome {
        ApproveOutcome::Created { auction_id } => auction_id,
        other => panic!("expected Created, got {:?}", other),
    };

    // Wind the request back to pending while keeping the back-reference,
    // modeling an interrupted earlier approval
    let stored = AuctionRequests::find_by_id(request.id).one(&db).await.unwrap().unwrap();
    let mut row: auction_requests::ActiveModel = stored.into();
    row.approval_status = Set(ApprovalStatus::Pending);
    row.update(&db).await.unwrap();

    let replay = approval::approve_request(&db, request.id, admin.id, None, now())
        .await
        .unwrap();
    assert_eq!(replay, ApproveOutcome::Created { auction_id });
    assert_eq!(Auctions::find().all(&db).await.unwrap().len(), 1);

    let finalized = AuctionRequests::find_by_id(request.id).one(&db).await.unwrap().unwrap();
    assert_eq!(finalized.approval_status, ApprovalStatus::Approved);
}

#[tokio::test]
async fn test_approve_missing_request_not_found() {
    let db = setup_test_db().await;
    let admin = seed_admin(&db, "Admin").await;

    let err = approval::approve_request(&db, 9999, admin.id, None, now())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn test_submit_validates_schedule() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;

    let mut body = request_body(seller.id, "R6");
    body.end_date = body.start_date - hours(1);
    let err = approval::submit_request(&db, body, now()).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidArgument {
            reason: ErrorReason::InvalidSchedule,
            ..
        }
    ));
}

#[tokio::test]
async fn test_requests_are_never_deleted() {
    let db = setup_test_db().await;
    let seller = seed_user(&db, "Seller", false).await;
    let admin = seed_admin(&db, "Admin").await;

    let approved = approval::submit_request(&db, request_body(seller.id, "R7"), now())
        .await
        .unwrap();
    approval::approve_request(&db, approved.id, admin.id, None, now())
        .await
        .unwrap();

    let rejected = approval::submit_request(&db, request_body(seller.id, "R8"), now())
        .await
        .unwrap();
    approval::reject_request(&db, rejected.id, admin.id, "no".into(), now())
        .await
        .unwrap();

    // Both rows remain as the audit trail
    let all = AuctionRequests::find()
        .filter(auction_requests::Column::SellerId.eq(seller.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

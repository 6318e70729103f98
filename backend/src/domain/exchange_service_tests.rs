//! Tests for the exchange proposal engine.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockAdRepository, MockExchangeRepository, MockUserDirectory};
use crate::domain::{AdContent, AdDraft, ErrorCode, UserId};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("valid fixture timestamp")
}

fn build_ad(owner: UserId, title: &str) -> Ad {
    let content = AdContent::try_from(AdDraft {
        title: title.to_owned(),
        description: format!("{title} in good shape"),
        image_url: None,
        categories: vec!["misc".to_owned()],
        condition: "used".to_owned(),
    })
    .expect("valid ad draft");
    Ad::new(AdId::random(), owner, content, fixture_now())
}

/// Two users, A and B, each with one ad, plus a second ad for A.
struct World {
    alice: UserId,
    bob: UserId,
    alice_ad: Ad,
    alice_other_ad: Ad,
    bob_ad: Ad,
}

impl World {
    fn ads(&self) -> HashMap<AdId, Ad> {
        [&self.alice_ad, &self.alice_other_ad, &self.bob_ad]
            .into_iter()
            .map(|ad| (ad.id(), ad.clone()))
            .collect()
    }

    fn pending_proposal(&self) -> ExchangeProposal {
        ExchangeProposal::open(
            ProposalId::random(),
            self.alice_ad.id(),
            self.bob_ad.id(),
            ProposalComment::new("hi").expect("valid comment"),
            fixture_now(),
        )
    }

    fn propose(
        &self,
        acting_user: UserId,
        target_user: UserId,
        sender: &Ad,
        receiver: &Ad,
    ) -> ProposeRequest {
        ProposeRequest {
            acting_user,
            target_user,
            sender_ad: sender.id(),
            receiver_ad: receiver.id(),
            comment: "hi".to_owned(),
        }
    }
}

#[fixture]
fn world() -> World {
    let alice = UserId::random();
    let bob = UserId::random();
    World {
        alice,
        bob,
        alice_ad: build_ad(alice, "Guitar"),
        alice_other_ad: build_ad(alice, "Amplifier"),
        bob_ad: build_ad(bob, "Bicycle"),
    }
}

fn known_users(users: &[UserId]) -> MockUserDirectory {
    let known = users.to_vec();
    let mut directory = MockUserDirectory::new();
    directory
        .expect_exists()
        .returning(move |id| Ok(known.contains(id)));
    directory
}

fn registry(world: &World) -> MockAdRepository {
    let ads = world.ads();
    let lookup = ads.clone();
    let mut repo = MockAdRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(lookup.get(id).cloned()));
    repo.expect_find_many().returning(move |ids| {
        Ok(ids.iter().filter_map(|id| ads.get(id).cloned()).collect())
    });
    repo
}

fn service(
    users: MockUserDirectory,
    ads: MockAdRepository,
    exchanges: MockExchangeRepository,
) -> ExchangeService<MockUserDirectory, MockAdRepository, MockExchangeRepository> {
    ExchangeService::new(
        Arc::new(users),
        Arc::new(ads),
        Arc::new(exchanges),
        Arc::new(FixtureClock {
            utc_now: fixture_now(),
        }),
    )
}

#[rstest]
#[tokio::test]
async fn propose_opens_a_pending_proposal(world: World) {
    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_find_by_pair().times(1).returning(|_, _| Ok(None));
    let expected_sender = world.alice_ad.id();
    exchanges
        .expect_insert()
        .withf(move |proposal| {
            proposal.sender_ad() == expected_sender && proposal.status() == ProposalStatus::Pending
        })
        .times(1)
        .returning(|_| Ok(()));
    let svc = service(known_users(&[world.alice, world.bob]), registry(&world), exchanges);

    let view = svc
        .propose(world.propose(world.alice, world.bob, &world.alice_ad, &world.bob_ad))
        .await
        .expect("proposal created");

    assert_eq!(view.proposal.status(), ProposalStatus::Pending);
    assert_eq!(view.proposal.created_at(), fixture_now());
    assert_eq!(view.proposal.comment().as_str(), "hi");
    assert_eq!(view.sender_ad.title, "Guitar");
    assert_eq!(view.receiver_ad.owner, world.bob);
}

#[rstest]
#[tokio::test]
async fn propose_to_unknown_user_is_not_found(world: World) {
    let svc = service(
        known_users(&[world.alice]),
        MockAdRepository::new(),
        MockExchangeRepository::new(),
    );

    let err = svc
        .propose(world.propose(world.alice, world.bob, &world.alice_ad, &world.bob_ad))
        .await
        .expect_err("unknown target");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn propose_to_self_is_invalid(world: World) {
    let svc = service(
        known_users(&[world.alice, world.bob]),
        MockAdRepository::new(),
        MockExchangeRepository::new(),
    );

    let err = svc
        .propose(world.propose(world.alice, world.alice, &world.alice_ad, &world.alice_other_ad))
        .await
        .expect_err("self proposal");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn propose_with_someone_elses_sender_ad_is_forbidden(world: World) {
    let svc = service(
        known_users(&[world.alice, world.bob]),
        registry(&world),
        MockExchangeRepository::new(),
    );

    let err = svc
        .propose(world.propose(world.alice, world.bob, &world.bob_ad, &world.bob_ad))
        .await
        .expect_err("sender ad owned by bob");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "you are not the owner of the offered ad");
}

#[rstest]
#[tokio::test]
async fn propose_for_ad_the_target_does_not_own_is_forbidden(world: World) {
    let svc = service(
        known_users(&[world.alice, world.bob]),
        registry(&world),
        MockExchangeRepository::new(),
    );

    let err = svc
        .propose(world.propose(world.alice, world.bob, &world.alice_ad, &world.alice_other_ad))
        .await
        .expect_err("receiver ad owned by alice");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "the target user does not own the requested ad");
}

#[rstest]
#[tokio::test]
async fn propose_with_unknown_ad_is_not_found(world: World) {
    let svc = service(
        known_users(&[world.alice, world.bob]),
        registry(&world),
        MockExchangeRepository::new(),
    );
    let ghost = build_ad(world.alice, "Ghost");

    let err = svc
        .propose(world.propose(world.alice, world.bob, &ghost, &world.bob_ad))
        .await
        .expect_err("ghost ad is not registered");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn propose_requires_a_comment(world: World, #[case] comment: &str) {
    let svc = service(
        known_users(&[world.alice, world.bob]),
        MockAdRepository::new(),
        MockExchangeRepository::new(),
    );
    let mut request = world.propose(world.alice, world.bob, &world.alice_ad, &world.bob_ad);
    request.comment = comment.to_owned();

    let err = svc.propose(request).await.expect_err("blank comment");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("comment")));
}

/// Requests that fail several checks at once report the earliest one.
#[rstest]
#[case::unknown_target_beats_blank_comment(false, false, "", ErrorCode::NotFound)]
#[case::unknown_target_beats_self_proposal(false, true, "hi", ErrorCode::NotFound)]
#[case::self_proposal_beats_blank_comment(true, true, " ", ErrorCode::InvalidRequest)]
#[tokio::test]
async fn propose_reports_the_first_failing_check(
    world: World,
    #[case] target_known: bool,
    #[case] to_self: bool,
    #[case] comment: &str,
    #[case] expected: ErrorCode,
) {
    let target = if to_self { world.alice } else { world.bob };
    let known = if target_known { vec![target] } else { Vec::new() };
    let svc = service(
        known_users(&known),
        MockAdRepository::new(),
        MockExchangeRepository::new(),
    );
    let mut request = world.propose(world.alice, target, &world.alice_ad, &world.bob_ad);
    request.comment = comment.to_owned();

    let err = svc.propose(request).await.expect_err("invalid proposal");

    assert_eq!(err.code(), expected);
    if expected == ErrorCode::InvalidRequest {
        assert_eq!(err.message(), "cannot propose an exchange to yourself");
    }
}

#[rstest]
#[tokio::test]
async fn propose_for_existing_pair_conflicts(world: World) {
    let existing = world.pending_proposal();
    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_pair()
        .returning(move |_, _| Ok(Some(existing.clone())));
    exchanges.expect_insert().times(0);
    let svc = service(known_users(&[world.alice, world.bob]), registry(&world), exchanges);

    let err = svc
        .propose(world.propose(world.alice, world.bob, &world.alice_ad, &world.bob_ad))
        .await
        .expect_err("duplicate pair");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn propose_losing_the_insert_race_conflicts(world: World) {
    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_find_by_pair().returning(|_, _| Ok(None));
    exchanges.expect_insert().returning(|proposal| {
        Err(ExchangeRepositoryError::duplicate_pair(
            proposal.sender_ad(),
            proposal.receiver_ad(),
        ))
    });
    let svc = service(known_users(&[world.alice, world.bob]), registry(&world), exchanges);

    let err = svc
        .propose(world.propose(world.alice, world.bob, &world.alice_ad, &world.bob_ad))
        .await
        .expect_err("storage rejects duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn store_outage_is_service_unavailable(world: World) {
    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_pair()
        .returning(|_, _| Err(ExchangeRepositoryError::connection("pool exhausted")));
    let svc = service(known_users(&[world.alice, world.bob]), registry(&world), exchanges);

    let err = svc
        .propose(world.propose(world.alice, world.bob, &world.alice_ad, &world.bob_ad))
        .await
        .expect_err("store down");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

fn stored(proposal: &ExchangeProposal) -> MockExchangeRepository {
    let found = proposal.clone();
    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));
    exchanges
}

#[rstest]
#[case(ProposalStatus::Accepted)]
#[case(ProposalStatus::Rejected)]
#[tokio::test]
async fn receiver_owner_resolves_pending_proposal(world: World, #[case] status: ProposalStatus) {
    let proposal = world.pending_proposal();
    let mut exchanges = stored(&proposal);
    let resolved = proposal.clone().transition_to(status).expect("legal edge");
    exchanges
        .expect_resolve_pending()
        .withf(move |_, next| *next == status)
        .times(1)
        .returning(move |_, _| Ok(ResolveOutcome::Resolved(resolved.clone())));
    let svc = service(MockUserDirectory::new(), registry(&world), exchanges);

    let view = svc
        .respond(RespondRequest {
            acting_user: world.bob,
            proposal_id: proposal.id(),
            status,
        })
        .await
        .expect("bob owns the receiver ad");

    assert_eq!(view.proposal.status(), status);
    assert_eq!(view.sender_ad.id, world.alice_ad.id());
}

#[rstest]
#[tokio::test]
async fn only_receiver_owner_may_respond(world: World) {
    let proposal = world.pending_proposal();
    let mut exchanges = stored(&proposal);
    exchanges.expect_resolve_pending().times(0);
    let svc = service(MockUserDirectory::new(), registry(&world), exchanges);

    let err = svc
        .respond(RespondRequest {
            acting_user: world.alice,
            proposal_id: proposal.id(),
            status: ProposalStatus::Rejected,
        })
        .await
        .expect_err("alice sent the proposal");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn responding_with_pending_is_invalid(world: World) {
    let svc = service(
        MockUserDirectory::new(),
        MockAdRepository::new(),
        MockExchangeRepository::new(),
    );

    let err = svc
        .respond(RespondRequest {
            acting_user: world.bob,
            proposal_id: ProposalId::random(),
            status: ProposalStatus::Pending,
        })
        .await
        .expect_err("pending is not a decision");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn responding_to_missing_proposal_is_not_found(world: World) {
    let mut exchanges = MockExchangeRepository::new();
    exchanges.expect_find_by_id().returning(|_| Ok(None));
    let svc = service(MockUserDirectory::new(), MockAdRepository::new(), exchanges);

    let err = svc
        .respond(RespondRequest {
            acting_user: world.bob,
            proposal_id: ProposalId::random(),
            status: ProposalStatus::Accepted,
        })
        .await
        .expect_err("nothing stored");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn resolved_proposals_are_final(world: World) {
    let accepted = world
        .pending_proposal()
        .transition_to(ProposalStatus::Accepted)
        .expect("legal edge");
    let mut exchanges = stored(&accepted);
    exchanges.expect_resolve_pending().times(0);
    let svc = service(MockUserDirectory::new(), registry(&world), exchanges);

    let err = svc
        .respond(RespondRequest {
            acting_user: world.bob,
            proposal_id: accepted.id(),
            status: ProposalStatus::Rejected,
        })
        .await
        .expect_err("already accepted");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "exchange proposal was already accepted");
}

#[rstest]
#[tokio::test]
async fn concurrent_response_that_loses_the_race_conflicts(world: World) {
    let proposal = world.pending_proposal();
    let mut exchanges = stored(&proposal);
    let winner = proposal
        .clone()
        .transition_to(ProposalStatus::Rejected)
        .expect("legal edge");
    exchanges
        .expect_resolve_pending()
        .returning(move |_, _| Ok(ResolveOutcome::NotPending(winner.clone())));
    let svc = service(MockUserDirectory::new(), registry(&world), exchanges);

    let err = svc
        .respond(RespondRequest {
            acting_user: world.bob,
            proposal_id: proposal.id(),
            status: ProposalStatus::Accepted,
        })
        .await
        .expect_err("someone else resolved it first");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(None, false)]
#[case(Some(ProposalStatus::Pending), false)]
#[case(None, true)]
#[tokio::test]
async fn list_sent_filters_by_sender_owner(
    world: World,
    #[case] status: Option<ProposalStatus>,
    #[case] with_counterpart: bool,
) {
    let proposal = world.pending_proposal();
    let counterpart = with_counterpart.then_some(world.bob);
    let expected = ExchangeListFilter {
        sender_owner: Some(world.alice),
        receiver_owner: counterpart,
        status,
    };
    let mut exchanges = MockExchangeRepository::new();
    let listed = proposal.clone();
    exchanges
        .expect_list()
        .withf(move |filter| *filter == expected)
        .returning(move |_| Ok(vec![listed.clone()]));
    let svc = service(MockUserDirectory::new(), registry(&world), exchanges);

    let views = svc
        .list_sent(ListSentRequest {
            acting_user: world.alice,
            counterpart,
            status,
        })
        .await
        .expect("listing succeeds");

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].proposal.id(), proposal.id());
    assert_eq!(views[0].receiver_ad.title, "Bicycle");
}

#[rstest]
#[tokio::test]
async fn list_received_filters_by_receiver_owner(world: World) {
    let expected = ExchangeListFilter {
        sender_owner: None,
        receiver_owner: Some(world.bob),
        status: Some(ProposalStatus::Accepted),
    };
    let mut exchanges = MockExchangeRepository::new();
    exchanges
        .expect_list()
        .withf(move |filter| *filter == expected)
        .returning(|_| Ok(Vec::new()));
    let mut ads = MockAdRepository::new();
    ads.expect_find_many().times(0);
    let svc = service(MockUserDirectory::new(), ads, exchanges);

    let views = svc
        .list_received(ListReceivedRequest {
            acting_user: world.bob,
            status: Some(ProposalStatus::Accepted),
        })
        .await
        .expect("listing succeeds");

    assert!(views.is_empty());
}

#[rstest]
#[tokio::test]
async fn listings_skip_proposals_with_vanished_ads(world: World) {
    let kept = world.pending_proposal();
    let orphan = ExchangeProposal::open(
        ProposalId::random(),
        world.alice_other_ad.id(),
        AdId::random(),
        ProposalComment::new("orphan").expect("valid comment"),
        fixture_now(),
    );
    let mut exchanges = MockExchangeRepository::new();
    let listed = vec![kept.clone(), orphan];
    exchanges
        .expect_list()
        .returning(move |_| Ok(listed.clone()));
    let svc = service(MockUserDirectory::new(), registry(&world), exchanges);

    let views = svc
        .list_sent(ListSentRequest {
            acting_user: world.alice,
            counterpart: None,
            status: None,
        })
        .await
        .expect("listing succeeds");

    assert_eq!(views.len(), 1);
    assert_eq!(views[0].proposal.id(), kept.id());
}

#[rstest]
#[tokio::test]
async fn get_is_open_to_any_user(world: World) {
    let proposal = world.pending_proposal();
    let svc = service(MockUserDirectory::new(), registry(&world), stored(&proposal));

    let view = svc
        .get(GetExchangeRequest {
            acting_user: UserId::random(),
            proposal_id: proposal.id(),
        })
        .await
        .expect("any user may read");

    assert_eq!(view.proposal, proposal);
}

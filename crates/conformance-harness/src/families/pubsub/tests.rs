//! Unit tests for the pub/sub family runner.

use std::sync::atomic::Ordering;
use std::time::Duration;

use conformance_config::{PubSubTestConfig, WaitStrategy};
use conformance_contracts::{
    DriverError, MessageHandler, PropertyMap, PubSubDriver, PublishRequest, SubscribeRequest,
};
use conformance_descriptor::{ComponentDescriptor, ResolvedComponent};
use mockall::mock;
use rstest::{fixture, rstest};

use super::*;
use crate::report::{PhaseFailure, PhaseStatus};
use crate::runner::CLOSE_PHASE;
use crate::tests::support::LoopbackBroker;

mock! {
    Broker {}
    impl PubSubDriver for Broker {
        fn init(&mut self, properties: &PropertyMap) -> Result<(), DriverError>;
        fn publish(&self, request: &PublishRequest) -> Result<(), DriverError>;
        fn subscribe(
            &self,
            request: &SubscribeRequest,
            handler: MessageHandler,
        ) -> Result<(), DriverError>;
        fn close(&mut self) -> Result<(), DriverError>;
    }
}

#[fixture]
fn component() -> ResolvedComponent {
    ResolvedComponent::from(&ComponentDescriptor::new("pubsub", "pubsub.loopback", "v1"))
}

#[fixture]
fn quick() -> PubSubTestConfig {
    PubSubTestConfig::default()
        .with_observation_window(Duration::from_millis(500))
        .with_wait_strategy(WaitStrategy::UntilExpected)
}

#[rstest]
fn delivered_messages_satisfy_the_verifier(component: ResolvedComponent, quick: PubSubTestConfig) {
    let broker = LoopbackBroker::default();
    let published = Arc::clone(&broker.publishes);
    let closes = Arc::clone(&broker.closes);

    let report = run_pubsub_component(&component, broker, &quick);

    assert!(report.all_passed(), "{report}");
    assert_eq!(published.load(Ordering::SeqCst), 10);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
    let names: Vec<&str> = report.phases().iter().map(|phase| phase.name()).collect();
    assert_eq!(names, [INIT_SUBSCRIBE, PUBLISH, VERIFY_DELIVERY, CLOSE_PHASE]);
}

#[rstest]
fn lost_messages_fail_verification(component: ResolvedComponent) {
    let broker = LoopbackBroker {
        drop_every_other: true,
        ..LoopbackBroker::default()
    };
    let config = PubSubTestConfig::default()
        .with_message_count(4)
        .with_observation_window(Duration::from_millis(100));

    let report = run_pubsub_component(&component, broker, &config);

    let verify = report.phase(VERIFY_DELIVERY).expect("verify phase");
    assert_eq!(verify.status(), PhaseStatus::Failed);
    assert!(matches!(
        verify.failures(),
        [PhaseFailure::Mismatch { message }] if message.contains("observed 2")
    ));
    assert_eq!(report.phase(PUBLISH).map(|p| p.status()), Some(PhaseStatus::Passed));
}

#[rstest]
fn failed_subscribe_skips_publish_and_verify(component: ResolvedComponent, quick: PubSubTestConfig) {
    let mut broker = MockBroker::new();
    broker.expect_init().once().returning(|_| Ok(()));
    broker
        .expect_subscribe()
        .once()
        .returning(|_, _| Err(DriverError::operation("subscribe", "no such topic")));
    broker.expect_publish().never();
    broker.expect_close().once().returning(|| Ok(()));

    let report = run_pubsub_component(&component, broker, &quick);

    let statuses: Vec<PhaseStatus> = report.phases().iter().map(|p| p.status()).collect();
    assert_eq!(
        statuses,
        [
            PhaseStatus::Failed,
            PhaseStatus::Skipped,
            PhaseStatus::Skipped,
            PhaseStatus::Passed
        ]
    );
    assert!(!report.all_passed());
}

#[rstest]
fn failed_init_never_subscribes(component: ResolvedComponent, quick: PubSubTestConfig) {
    let mut broker = MockBroker::new();
    broker
        .expect_init()
        .once()
        .returning(|_| Err(DriverError::MissingProperty { name: String::from("host") }));
    broker.expect_subscribe().never();
    broker.expect_publish().never();
    broker.expect_close().once().returning(|| Ok(()));

    let report = run_pubsub_component(&component, broker, &quick);
    assert_eq!(report.summary().skipped, 2);
}

#[rstest]
fn publish_carries_topic_name_payloads_and_metadata(component: ResolvedComponent) {
    let config = PubSubTestConfig::default()
        .with_message_count(3)
        .with_publish_metadata("ttlInSeconds", "30")
        .with_observation_window(Duration::ZERO);
    let mut broker = MockBroker::new();
    broker.expect_init().returning(|_| Ok(()));
    broker
        .expect_subscribe()
        .withf(|request, _| request.topic() == "testtopic")
        .returning(|_, _| Ok(()));
    let mut sequence = mockall::Sequence::new();
    for index in 0..3 {
        broker
            .expect_publish()
            .withf(move |request| {
                request.pubsub_name() == "pubsub"
                    && request.topic() == "testtopic"
                    && request.data() == payload(index).as_slice()
                    && request.metadata().get("ttlInSeconds").map(String::as_str) == Some("30")
            })
            .once()
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
    }
    broker.expect_close().returning(|| Ok(()));

    let report = run_pubsub_component(&component, broker, &config);
    assert_eq!(report.phase(PUBLISH).map(|p| p.status()), Some(PhaseStatus::Passed));
}

//! Pub/sub conformance.
//!
//! Phases: `init_subscribe` (init followed by a subscription whose handler
//! feeds the run's [`DeliveryCounter`]), `publish` (N payloads
//! `message-0` .. `message-<N-1>`), and `verify_delivery` (at least N
//! deliveries within the observation window), followed by `close`. When
//! `init_subscribe` fails, publishing and verification are skipped.

use std::path::Path;
use std::sync::Arc;

use conformance_config::PubSubTestConfig;
use conformance_contracts::{
    CapabilityFamily, PropertyMap, PubSubDriver, PublishRequest, SubscribeRequest,
};
use conformance_descriptor::ResolvedComponent;
use tracing::debug;

use crate::budget::LatencyBudget;
use crate::delivery::DeliveryCounter;
use crate::error::SetupError;
use crate::phase::{Phase, Probe};
use crate::report::ConformanceReport;
use crate::runner::ConformanceRunner;
use crate::session::DriverSession;

/// Phase name for init plus subscribe.
pub const INIT_SUBSCRIBE: &str = "init_subscribe";
/// Phase name for publishing.
pub const PUBLISH: &str = "publish";
/// Phase name for delivery verification.
pub const VERIFY_DELIVERY: &str = "verify_delivery";

/// Payload of the `index`th published message.
#[must_use]
pub fn payload(index: usize) -> Vec<u8> {
    format!("message-{index}").into_bytes()
}

/// Runs the pub/sub family against the component described under
/// `config_path`.
///
/// # Errors
///
/// Returns a [`SetupError`] when the descriptor is missing, malformed, or
/// not a pub/sub component.
pub fn run_pubsub_conformance<D, F>(
    config_path: &Path,
    factory: F,
    config: &PubSubTestConfig,
) -> Result<ConformanceReport, SetupError>
where
    D: PubSubDriver + 'static,
    F: FnOnce() -> D,
{
    let component = super::load_component(CapabilityFamily::PubSub, config_path)?;
    Ok(run_pubsub_component(&component, factory(), config))
}

/// Runs the pub/sub family against an already loaded component.
#[must_use]
pub fn run_pubsub_component<D>(
    component: &ResolvedComponent,
    driver: D,
    config: &PubSubTestConfig,
) -> ConformanceReport
where
    D: PubSubDriver + 'static,
{
    let counter = DeliveryCounter::new();
    ConformanceRunner::new(
        CapabilityFamily::PubSub,
        component.name(),
        component.component_type(),
    )
    .phases(pubsub_phases(component.properties().clone(), config, &counter))
    .run(DriverSession::new(
        driver,
        <D as PubSubDriver>::close,
        component.name(),
    ))
}

/// Builds the pub/sub phase list reporting deliveries to `counter`.
#[must_use]
pub fn pubsub_phases<D>(
    properties: PropertyMap,
    config: &PubSubTestConfig,
    counter: &Arc<DeliveryCounter>,
) -> Vec<Phase<D>>
where
    D: PubSubDriver + 'static,
{
    let count = config.message_count();
    let subscribe = SubscribeRequest::new(config.topic())
        .with_metadata(config.subscribe_metadata().clone());
    let handler = counter.handler();
    let requests: Vec<PublishRequest> = (0..count)
        .map(|index| {
            PublishRequest::new(config.pubsub_name(), config.topic(), payload(index))
                .with_metadata(config.publish_metadata().clone())
        })
        .collect();
    let observed = Arc::clone(counter);
    let window = config.observation_window();
    let strategy = config.wait_strategy();

    vec![
        Phase::new(INIT_SUBSCRIBE, move |driver: &mut D, probe: &mut Probe| {
            probe.time(|| driver.init(&properties))?;
            probe.time(|| driver.subscribe(&subscribe, handler))
        })
        .with_optional_budget(config.max_init().map(LatencyBudget::singular)),
        Phase::new(PUBLISH, move |driver: &mut D, probe: &mut Probe| {
            requests
                .iter()
                .try_for_each(|request| probe.time(|| driver.publish(request)))
        })
        .with_optional_budget(
            config
                .max_publish()
                .map(|per_message| LatencyBudget::scaled(per_message, count)),
        )
        .requires(INIT_SUBSCRIBE),
        Phase::new(VERIFY_DELIVERY, move |_driver: &mut D, probe: &mut Probe| {
            let outcome = observed.wait(count, window, strategy);
            debug!(
                target: "conformance",
                expected = outcome.expected(),
                delivered = outcome.delivered(),
                waited_ms = u64::try_from(outcome.waited().as_millis()).unwrap_or(u64::MAX),
                "delivery observation finished"
            );
            if !outcome.is_satisfied() {
                probe.mismatch(format!(
                    "expected at least {} deliveries within {}ms, observed {}",
                    outcome.expected(),
                    window.as_millis(),
                    outcome.delivered()
                ));
            }
            Ok(())
        })
        .requires(INIT_SUBSCRIBE),
    ]
}

#[cfg(test)]
mod tests;

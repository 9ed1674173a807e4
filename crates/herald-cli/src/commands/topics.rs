//! `herald topics`: typed topics and channel receivers.

use anyhow::{Result, bail};
use colored::Colorize;
use herald_events::{DeliveryPolicy, EventError, Topic, TopicBus};

#[derive(Debug, Clone)]
struct CartUpdated {
    items: u32,
    total_cents: u64,
}

const CART_UPDATED: Topic<CartUpdated> = Topic::new("cart-updated");
const TOAST: Topic<String> = Topic::new("toast");

pub(crate) async fn run_topics(policy: DeliveryPolicy) -> Result<()> {
    let bus = TopicBus::with_policy(policy);
    println!("{} (delivery: {})", "Herald topics".cyan().bold(), policy);

    // The badge reacts synchronously and raises a toast for the receiver.
    let toasts = bus.clone();
    let _badge = bus.subscribe_fn(&CART_UPDATED, move |cart: &CartUpdated| {
        let message = format!(
            "{} item(s), {}.{:02}",
            cart.items,
            cart.total_cents.div_euclid(100),
            cart.total_cents.rem_euclid(100)
        );
        if let Err(e) = toasts.publish(&TOAST, &message) {
            tracing::warn!(error = %e, "toast not delivered");
        }
    })?;

    let mut receiver = bus.registry(&TOAST)?.subscribe_channel(TOAST.name());

    for (items, total_cents) in [(1, 1_250), (3, 4_999)] {
        bus.publish(&CART_UPDATED, &CartUpdated { items, total_cents })?;
    }

    for _ in 0..2 {
        let Some(toast) = receiver.recv().await else {
            bail!("toast channel closed early");
        };
        println!("  {} {toast}", "toast:".green());
    }

    let wrong: Topic<u32> = Topic::named(CART_UPDATED.name());
    match bus.publish(&wrong, &3) {
        Err(e @ EventError::PayloadMismatch { .. }) => {
            println!("  {} {e}", "rejected:".yellow());
        },
        Ok(_) => bail!("mismatched payload was accepted"),
    }

    println!("  topics: {}", bus.topics().join(", "));
    Ok(())
}

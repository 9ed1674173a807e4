//! `herald demo`: the form-submitted walkthrough.

use colored::Colorize;
use herald_cli::components::{FORM_SUBMITTED, Greeter, NameLog, SignupForm};
use herald_events::{DeliveryPolicy, EventRegistry};

pub(crate) fn run_demo(policy: DeliveryPolicy) {
    let bus = EventRegistry::<String>::with_policy(policy);
    println!("{} (delivery: {})", "Herald demo".cyan().bold(), policy);

    let form = SignupForm::new(bus.clone());
    let log = NameLog::mount(&bus);
    let greeter = Greeter::mount(&bus);
    println!(
        "  mounted NameLog and Greeter ({} listeners on {FORM_SUBMITTED})",
        bus.subscriber_count(FORM_SUBMITTED)
    );

    let notified = form.submit("Alice");
    println!("  submit(Alice) reached {notified} listeners");
    for line in greeter.greetings() {
        println!("    {} {line}", "greeter:".green());
    }

    drop(greeter);
    println!("  unmounted Greeter");

    let notified = form.submit("Bob");
    println!("  submit(Bob) reached {notified} listeners");
    form.reset();

    for line in log.entries() {
        println!("    {} {line}", "log:".green());
    }

    drop(log);
    println!(
        "  unmounted NameLog, registry empty: {}",
        if bus.is_empty() { "yes".green() } else { "no".red() }
    );
}

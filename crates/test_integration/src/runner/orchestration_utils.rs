use color_eyre::Result;
use colored::Colorize;
use std::future::Future;
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! run_test {
    ($call:expr) => {
        $crate::runner::orchestration_utils::run_test_impl(stringify!($call), $call)
    };
}

/// Runs the given tests in order against one context, stopping at the first failure.
#[macro_export]
macro_rules! execute_suite {
    ($context:expr, [ $($test_fn:ident),* $(,)? ]) => {{
        let total_tests = 0 $( + { let _ = stringify!($test_fn); 1 } )*;
        let mut passed_tests = 0;
        let suite_start = std::time::Instant::now();

        $(
            $crate::run_test!($test_fn($context)).await?;
            passed_tests += 1;
        )*

        $crate::runner::orchestration_utils::print_summary(
            passed_tests,
            total_tests,
            suite_start.elapsed(),
        );
    }};
}

/// Prints a banner around one test and passes its result through.
pub async fn run_test_impl<Fut>(raw_name: &str, test: Fut) -> Result<()>
where
    Fut: Future<Output = Result<()>>,
{
    let name = raw_name.split('(').next().unwrap_or(raw_name).trim();
    println!("{}", "─".repeat(60).truecolor(80, 80, 80));
    println!("{} {}", " RUNNING ".on_cyan().black().bold(), name.cyan().bold());

    let start_time = Instant::now();
    let result = test.await;
    let elapsed = start_time.elapsed();

    match &result {
        Ok(()) => println!(
            "{} {} ({elapsed:.2?})",
            " PASSED ".on_green().black().bold(),
            name.green()
        ),
        Err(e) => {
            println!(
                "{} {} ({elapsed:.2?})",
                " FAILED ".on_red().black().bold(),
                name.red()
            );
            println!("\n{e:?}");
        }
    }
    result
}

pub fn print_summary(passed: usize, total: usize, elapsed: std::time::Duration) {
    println!("{}", "─".repeat(60).truecolor(80, 80, 80));
    println!(
        "{} {passed}/{total} tests passed in {elapsed:.2?}.",
        " SUMMARY ".on_purple().black().bold()
    );
    println!("{}", "─".repeat(60).truecolor(80, 80, 80));
}

pub fn setup_tracing_and_panic_handling() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,sqlx=warn,api=debug,common_services=debug,hyper=error".into());

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .compact()
        .with_target(false)
        .finish();

    // Another test in the same binary may have installed these already.
    let _ = tracing::subscriber::set_global_default(subscriber);
    let _ = color_eyre::install();
}

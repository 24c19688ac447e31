//! Simulation statistics collection and reporting.
//!
//! This module tracks per-run counters for the pipeline model:
//! 1. **Cycles:** Total simulation cycles elapsed.
//! 2. **Source:** Instructions admitted, cancellations scheduled/delivered.
//! 3. **Pipeline:** Queue claims, setup adoptions, and station releases.

use std::time::Instant;

/// Simulation statistics structure tracking all model counters.
#[derive(Debug, Clone)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulation cycles elapsed.
    pub cycles: u64,
    /// Instructions synthesized and appended to the admission queue.
    pub instructions_admitted: u64,
    /// Cancellations enqueued into the delay schedule at admission time.
    pub cancellations_scheduled: u64,
    /// Cancellations delivered (instructions marked canceled).
    pub cancellations_delivered: u64,
    /// Queue heads claimed by reservation stations.
    pub claims: u64,
    /// Instructions adopted by the setup stage.
    pub adoptions: u64,
    /// Station releases caused by cancellation.
    pub releases_canceled: u64,
    /// Station releases caused by completion.
    pub releases_finished: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_admitted: 0,
            cancellations_scheduled: 0,
            cancellations_delivered: 0,
            claims: 0,
            adoptions: 0,
            releases_canceled: 0,
            releases_finished: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"pipeline"`. Pass an empty slice
/// to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "pipeline"];

impl SimStats {
    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"summary"` or
    /// `"pipeline"`. Pass an empty slice to print all sections (same as
    /// `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = if self.cycles == 0 { 1 } else { self.cycles };

        if want("summary") {
            println!("\n==========================================================");
            println!("PIPELINE LOOP MODEL STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_insts                {}", self.instructions_admitted);
            println!(
                "sim_admit_rate           {:.4} insts/cycle",
                self.instructions_admitted as f64 / cyc as f64
            );
            println!("----------------------------------------------------------");
        }
        if want("pipeline") {
            let scheduled = self.cancellations_scheduled;
            let cancel_share = if self.instructions_admitted > 0 {
                100.0 * scheduled as f64 / self.instructions_admitted as f64
            } else {
                0.0
            };
            println!("PIPELINE BREAKDOWN");
            println!("  queue.claims           {}", self.claims);
            println!("  setup.adoptions        {}", self.adoptions);
            println!(
                "  cancel.scheduled       {scheduled} ({cancel_share:.2}% of admitted)"
            );
            println!("  cancel.delivered       {}", self.cancellations_delivered);
            println!("  release.canceled       {}", self.releases_canceled);
            println!("  release.finished       {}", self.releases_finished);
            println!("----------------------------------------------------------");
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

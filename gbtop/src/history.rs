//! Small utilities to manage bounded buffers and chart series.

use std::collections::VecDeque;

use crate::derive::ChartView;

/// Push to the back, evicting from the front once `cap` is reached.
pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if cap == 0 {
        return;
    }
    while dq.len() >= cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

// Chart points keyed by sample index (x = 0 is the oldest point)
pub fn chart_series(view: &ChartView) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mem = view
        .memory
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v.clamp(0.0, 100.0)))
        .collect();
    let cpu = view
        .cpu
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, v.clamp(0.0, 100.0)))
        .collect();
    (mem, cpu)
}

//! Conventional sort routines written against a [`PacedBuffer`]
//!
//! These are ordinary loops and recursion; the pacing lives entirely in the
//! buffer handle. Each routine performs the same sequence of buffer
//! operations as its state-machine counterpart in [`crate::sort`], where one
//! exists.

use super::pacer::{Halt, PacedBuffer};
use std::cmp::Ordering;

pub fn bubble<T: Ord + Clone>(buf: &mut PacedBuffer<T>) -> Result<(), Halt> {
    let mut bound = buf.len().saturating_sub(1);
    loop {
        let mut swapped = false;
        for i in 0..bound {
            if buf.compare(i, i + 1)? == Ordering::Greater {
                buf.swap(i, i + 1)?;
                swapped = true;
            }
        }
        if !swapped || bound <= 1 {
            return Ok(());
        }
        bound -= 1;
    }
}

/// Restart from the front after every swap. Quadratic passes on top of a
/// quadratic scan: slow on purpose.
pub fn awful<T: Ord + Clone>(buf: &mut PacedBuffer<T>) -> Result<(), Halt> {
    loop {
        let mut swapped = false;
        let mut i = 1;
        while i < buf.len() {
            if buf.compare(i, i - 1)? == Ordering::Less {
                buf.swap(i, i - 1)?;
                swapped = true;
                i = 1;
            } else {
                i += 1;
            }
        }
        if !swapped {
            return Ok(());
        }
    }
}

pub fn quick<T: Ord + Clone>(buf: &mut PacedBuffer<T>) -> Result<(), Halt> {
    if buf.len() > 1 {
        quick_range(buf, 0, buf.len() - 1)?;
    }
    Ok(())
}

fn quick_range<T: Ord + Clone>(
    buf: &mut PacedBuffer<T>,
    beg: usize,
    end: usize,
) -> Result<(), Halt> {
    let pivot = buf.get(beg + (end - beg) / 2)?;
    let (mut i, mut j) = (beg as isize, end as isize);

    while i < j {
        while buf.compare_value(i as usize, &pivot)? == Ordering::Less {
            i += 1;
        }
        while buf.compare_value(j as usize, &pivot)? == Ordering::Greater {
            j -= 1;
        }
        if i < j {
            buf.swap(i as usize, j as usize)?;
        }
        if i <= j {
            i += 1;
            j -= 1;
        }
    }

    let right = (i < end as isize).then(|| (i as usize, end));
    let left = ((beg as isize) < j).then(|| (beg, j as usize));

    // Smaller side first
    let order = match (left, right) {
        (Some(l), Some(r)) if l.1 - l.0 > r.1 - r.0 => [right, left],
        _ => [left, right],
    };
    for (beg, end) in order.into_iter().flatten() {
        quick_range(buf, beg, end)?;
    }
    Ok(())
}

//! File descriptor limit detection for capping the scan pool (Unix).

use log::debug;

/// Estimated file descriptors held per scan worker (the open file, plus a mapping or reader).
const FDS_PER_WORKER: usize = 2;

/// Fraction of the process FD limit to use (leave headroom for other code).
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY is typically !0 or u64::MAX; treat as "no practical limit"
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
fn max_open_fds() -> Option<u64> {
    None
}

/// Suggested max worker count so we stay under ~80% of the FD limit.
/// Returns `None` if no limit is available (use caller's default).
fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    if usable < FDS_PER_WORKER {
        return Some(1);
    }
    Some(usable / FDS_PER_WORKER)
}

/// Apply the FD cap to `requested` workers.
pub fn cap_workers_by_fd_limit(requested: usize) -> usize {
    match max_workers_by_fd_limit() {
        Some(fd_cap) if fd_cap < requested => {
            debug!("Capping workers {} -> {} (FD limit ~80%)", requested, fd_cap);
            fd_cap.max(1)
        }
        _ => requested.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_never_zero() {
        assert!(cap_workers_by_fd_limit(0) >= 1);
        assert!(cap_workers_by_fd_limit(1) == 1);
    }

    #[test]
    fn test_cap_not_above_request() {
        assert!(cap_workers_by_fd_limit(4) <= 4);
    }
}

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

/// Gate for live socket connections: a total cap and a per-address cap.
pub struct ConnectionAdmission {
    max_total: usize,
    max_per_ip: usize,
    total: AtomicUsize,
    per_ip: DashMap<IpAddr, usize>,
}

impl ConnectionAdmission {
    pub fn new(max_total: usize, max_per_ip: usize) -> Arc<Self> {
        Arc::new(Self {
            max_total,
            max_per_ip,
            total: AtomicUsize::new(0),
            per_ip: DashMap::new(),
        })
    }

    /// Reserve a slot for a connection from `ip`. `None` means the
    /// connection must be closed without being subscribed.
    pub fn reserve(self: &Arc<Self>, ip: IpAddr) -> Option<ConnectionSlot> {
        let max_total = self.max_total;
        if self
            .total
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (current < max_total).then_some(current + 1)
            })
            .is_err()
        {
            debug!(%ip, max_total, "Connection refused, namespace full");
            return None;
        }

        {
            let mut count = self.per_ip.entry(ip).or_insert(0);
            if *count >= self.max_per_ip {
                drop(count);
                self.total.fetch_sub(1, Ordering::AcqRel);
                debug!(%ip, max_per_ip = self.max_per_ip, "Connection refused, address limit reached");
                return None;
            }
            *count += 1;
        }

        Some(ConnectionSlot {
            admission: Arc::clone(self),
            ip,
            released: AtomicBool::new(false),
        })
    }

    pub fn active(&self) -> usize {
        self.total.load(Ordering::Acquire)
    }

    pub fn active_for(&self, ip: IpAddr) -> usize {
        self.per_ip.get(&ip).map(|count| *count).unwrap_or(0)
    }

    fn release(&self, ip: IpAddr) {
        if let Some(mut count) = self.per_ip.get_mut(&ip) {
            *count = count.saturating_sub(1);
        }
        self.per_ip.remove_if(&ip, |_, count| *count == 0);

        let _ = self
            .total
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| current.checked_sub(1));
    }
}

/// A granted reservation. Released exactly once, either explicitly or on
/// drop.
pub struct ConnectionSlot {
    admission: Arc<ConnectionAdmission>,
    ip: IpAddr,
    released: AtomicBool,
}

impl ConnectionSlot {
    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.admission.release(self.ip);
        }
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ConnectionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSlot")
            .field("ip", &self.ip)
            .field("released", &self.released.load(Ordering::Acquire))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn test_total_limit() {
        let admission = ConnectionAdmission::new(2, 10);

        let a = admission.reserve(ip(1)).unwrap();
        let _b = admission.reserve(ip(2)).unwrap();
        assert!(admission.reserve(ip(3)).is_none());

        drop(a);
        assert!(admission.reserve(ip(3)).is_some());
    }

    #[test]
    fn test_per_ip_limit_rolls_back_total() {
        let admission = ConnectionAdmission::new(10, 1);

        let _a = admission.reserve(ip(1)).unwrap();
        assert!(admission.reserve(ip(1)).is_none());
        assert_eq!(admission.active(), 1);
        assert!(admission.reserve(ip(2)).is_some());
    }

    #[test]
    fn test_release_is_idempotent() {
        let admission = ConnectionAdmission::new(10, 10);
        let _other = admission.reserve(ip(2)).unwrap();
        let slot = admission.reserve(ip(1)).unwrap();

        slot.release();
        slot.release();
        drop(slot);

        assert_eq!(admission.active(), 1);
        assert_eq!(admission.active_for(ip(1)), 0);
        assert_eq!(admission.active_for(ip(2)), 1);
    }

    #[test]
    fn test_concurrent_reservations_respect_limit() {
        let admission = ConnectionAdmission::new(50, 1000);

        let slots: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..100)
                .map(|i| {
                    let admission = Arc::clone(&admission);
                    scope.spawn(move || admission.reserve(ip((i % 250) as u8)))
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|h| h.join().unwrap())
                .collect()
        });

        assert_eq!(slots.len(), 50);
        assert_eq!(admission.active(), 50);

        drop(slots);
        assert_eq!(admission.active(), 0);
    }
}

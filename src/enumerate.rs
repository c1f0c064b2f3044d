//! Two-call enumeration with retry on `VK_INCOMPLETE`

use ash::vk;
use log::trace;

use crate::error::{check, Result, VkInfoError};

/// Run a count-then-fetch enumeration until the runtime stops reporting
/// `VK_INCOMPLETE`
///
/// `query` is called with `None` to ask for the element count and with
/// `Some(buffer)` to fetch. In both cases the runtime stores a count in the
/// `u32`: the required size for the count call, the number of elements
/// written for the fetch. A fetch returning `VK_INCOMPLETE` means the list
/// grew between the two calls, so the count is queried again.
///
/// Failures are reported as `"<call> (count)"` or `"<call> (data)"`.
pub fn enumerate<T, F>(call: &str, mut query: F) -> Result<Vec<T>>
where
    T: Default + Clone,
    F: FnMut(&mut u32, Option<&mut [T]>) -> vk::Result,
{
    let mut items = Vec::new();
    let mut rounds = 0u32;
    loop {
        let mut count = 0u32;
        check(&format!("{call} (count)"), query(&mut count, None))?;

        items.clear();
        items.resize(count as usize, T::default());
        let status = query(&mut count, Some(items.as_mut_slice()));
        rounds += 1;

        match status {
            vk::Result::SUCCESS => {
                items.truncate(count as usize);
                trace!("{call}: {} item(s) after {rounds} round(s)", items.len());
                return Ok(items);
            }
            vk::Result::INCOMPLETE => {
                trace!("{call}: incomplete with {count} item(s), retrying");
            }
            status => return Err(VkInfoError::call(format!("{call} (data)"), status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// A list that gains `growth` elements on each of the first `grow_times` fetches
    struct GrowingList {
        items: RefCell<Vec<u32>>,
        growth: usize,
        grow_times: Cell<u32>,
        reported: RefCell<Vec<u32>>,
    }

    impl GrowingList {
        fn new(initial: usize, growth: usize, grow_times: u32) -> Self {
            Self {
                items: RefCell::new((0..initial as u32).collect()),
                growth,
                grow_times: Cell::new(grow_times),
                reported: RefCell::new(Vec::new()),
            }
        }

        fn query(&self, count: &mut u32, out: Option<&mut [u32]>) -> vk::Result {
            let Some(out) = out else {
                *count = self.items.borrow().len() as u32;
                self.reported.borrow_mut().push(*count);
                return vk::Result::SUCCESS;
            };
            if self.grow_times.get() > 0 {
                self.grow_times.set(self.grow_times.get() - 1);
                let mut items = self.items.borrow_mut();
                let next = items.len() as u32;
                items.extend(next..next + self.growth as u32);
            }
            let items = self.items.borrow();
            let written = out.len().min(items.len());
            out[..written].copy_from_slice(&items[..written]);
            *count = written as u32;
            if written < items.len() {
                vk::Result::INCOMPLETE
            } else {
                vk::Result::SUCCESS
            }
        }
    }

    #[test]
    fn test_enumerate_without_retry() {
        let list = GrowingList::new(3, 0, 0);
        let items = enumerate("vkEnumerateThings", |c, o| list.query(c, o)).unwrap();
        assert_eq!(items, vec![0, 1, 2]);
        assert_eq!(*list.reported.borrow(), vec![3]);
    }

    #[test]
    fn test_enumerate_empty() {
        let list = GrowingList::new(0, 0, 0);
        let items = enumerate("vkEnumerateThings", |c, o| list.query(c, o)).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_enumerate_retries_until_success() {
        let list = GrowingList::new(2, 2, 3);
        let items = enumerate("vkEnumerateThings", |c, o| list.query(c, o)).unwrap();

        let reported = list.reported.borrow();
        assert_eq!(reported.len(), 4);
        assert_eq!(items.len() as u32, *reported.last().unwrap());
        assert_eq!(items, (0..8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_enumerate_truncates_to_written_count() {
        // Count says 4 but the fetch only fills 2
        let items = enumerate("vkEnumerateThings", |count: &mut u32, out: Option<&mut [u8]>| {
            match out {
                None => *count = 4,
                Some(buf) => {
                    buf[0] = 7;
                    buf[1] = 9;
                    *count = 2;
                }
            }
            vk::Result::SUCCESS
        })
        .unwrap();
        assert_eq!(items, vec![7, 9]);
    }

    #[test]
    fn test_enumerate_count_failure() {
        let mut fetches = 0;
        let err = enumerate("vkEnumerateThings", |_: &mut u32, out: Option<&mut [u8]>| {
            if out.is_some() {
                fetches += 1;
            }
            vk::Result::ERROR_OUT_OF_HOST_MEMORY
        })
        .unwrap_err();
        assert_eq!(fetches, 0);
        assert_eq!(
            err.to_string(),
            "vkEnumerateThings (count) failed: VK_ERROR_OUT_OF_HOST_MEMORY (-1)"
        );
    }

    #[test]
    fn test_enumerate_data_failure() {
        let err = enumerate("vkEnumerateThings", |count: &mut u32, out: Option<&mut [u8]>| {
            if out.is_none() {
                *count = 1;
                vk::Result::SUCCESS
            } else {
                vk::Result::ERROR_DEVICE_LOST
            }
        })
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "vkEnumerateThings (data) failed: VK_ERROR_DEVICE_LOST (-4)"
        );
    }
}

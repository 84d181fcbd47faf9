//! The cursor pagination loop emitted for `paginate` data sources, expressed
//! over a [`PageSource`] so its termination and truncation rules can be
//! exercised without a Go toolchain.

/// One page returned by the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Absent is treated as `false`.
    pub has_more: Option<bool>,
    pub last_id: Option<String>,
}

/// Parameters of one list call.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Cursor: the last identifier of the previous page.
    pub after: Option<String>,
    pub limit: i64,
}

pub trait PageSource {
    type Item;
    type Error;

    fn fetch(&mut self, request: &PageRequest) -> Result<Page<Self::Item>, Self::Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Fetching(PageRequest),
    Accumulating { has_more: bool, last_id: Option<String> },
    CheckingHasMore { has_more: bool, last_id: Option<String> },
    Done,
}

/// Drives a [`PageSource`] until it runs dry or `limit` items are collected.
pub struct Paginator<S: PageSource> {
    source: S,
    page_size: i64,
    limit: Option<i64>,
    items: Vec<S::Item>,
    state: State,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S, page_size: i64, limit: Option<i64>) -> Self {
        let first = PageRequest {
            after: None,
            limit: page_size,
        };
        Self {
            source,
            page_size,
            limit,
            items: Vec::new(),
            state: State::Fetching(first),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    fn remaining(&self) -> Option<i64> {
        self.limit.map(|limit| limit - self.items.len() as i64)
    }

    fn limit_reached(&self) -> bool {
        matches!(self.remaining(), Some(remaining) if remaining <= 0)
    }

    /// Advance by one transition.
    pub fn step(&mut self) -> Result<(), S::Error> {
        let state = std::mem::replace(&mut self.state, State::Done);
        self.state = match state {
            State::Fetching(mut request) => {
                if self.limit_reached() {
                    State::Done
                } else {
                    if let Some(remaining) = self.remaining() {
                        request.limit = request.limit.min(remaining);
                    }
                    tracing::trace!(after = ?request.after, limit = request.limit, "fetching page");
                    let page = self.source.fetch(&request)?;
                    if page.data.is_empty() {
                        // No progress is possible without a new cursor.
                        State::Done
                    } else {
                        self.items.extend(page.data);
                        State::Accumulating {
                            has_more: page.has_more.unwrap_or(false),
                            last_id: page.last_id,
                        }
                    }
                }
            }
            State::Accumulating { has_more, last_id } => match self.limit {
                Some(limit) if self.items.len() as i64 >= limit => {
                    self.items.truncate(limit.max(0) as usize);
                    State::Done
                }
                _ => State::CheckingHasMore { has_more, last_id },
            },
            State::CheckingHasMore { has_more, last_id } => {
                if has_more {
                    State::Fetching(PageRequest {
                        after: last_id,
                        limit: self.page_size,
                    })
                } else {
                    State::Done
                }
            }
            State::Done => State::Done,
        };
        Ok(())
    }

    pub fn run(mut self) -> Result<Vec<S::Item>, S::Error> {
        while self.state != State::Done {
            self.step()?;
        }
        Ok(self.items)
    }
}

/// Collect every item `source` yields, up to `limit`.
pub fn collect_pages<S: PageSource>(
    source: S,
    page_size: i64,
    limit: Option<i64>,
) -> Result<Vec<S::Item>, S::Error> {
    Paginator::new(source, page_size, limit).run()
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Serves `total` sequential integers, recording every request.
    struct Numbers {
        total: usize,
        requests: Vec<PageRequest>,
    }

    impl Numbers {
        fn new(total: usize) -> Self {
            Self {
                total,
                requests: Vec::new(),
            }
        }
    }

    impl PageSource for &mut Numbers {
        type Item = usize;
        type Error = String;

        fn fetch(&mut self, request: &PageRequest) -> Result<Page<usize>, String> {
            self.requests.push(request.clone());
            let start = match &request.after {
                Some(after) => after.parse::<usize>().map_err(|e| e.to_string())? + 1,
                None => 0,
            };
            let end = (start + request.limit as usize).min(self.total);
            let data: Vec<usize> = (start..end).collect();
            Ok(Page {
                has_more: Some(end < self.total),
                last_id: data.last().map(|id| id.to_string()),
                data,
            })
        }
    }

    #[test]
    fn test_follows_cursor_until_exhausted() {
        let mut numbers = Numbers::new(250);

        let items = collect_pages(&mut numbers, 100, None).unwrap();

        assert_eq!(items, (0..250).collect::<Vec<_>>());
        let cursors: Vec<_> = numbers.requests.iter().map(|r| r.after.clone()).collect();
        assert_eq!(
            cursors,
            vec![None, Some("99".to_owned()), Some("199".to_owned())]
        );
    }

    #[test]
    fn test_limit_truncates_and_stops_early() {
        let mut numbers = Numbers::new(250);

        let items = collect_pages(&mut numbers, 100, Some(120)).unwrap();

        assert_eq!(items.len(), 120);
        assert_eq!(items[119], 119);
        assert_eq!(numbers.requests.len(), 2);
        assert_eq!(numbers.requests[1].limit, 20);
    }

    #[test]
    fn test_small_limit_shrinks_first_request() {
        let mut numbers = Numbers::new(250);

        let items = collect_pages(&mut numbers, 100, Some(5)).unwrap();

        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        assert_eq!(numbers.requests.len(), 1);
        assert_eq!(numbers.requests[0].limit, 5);
    }

    #[test]
    fn test_missing_has_more_ends_the_loop() {
        struct OnePage;

        impl PageSource for OnePage {
            type Item = u8;
            type Error = ();

            fn fetch(&mut self, _: &PageRequest) -> Result<Page<u8>, ()> {
                Ok(Page {
                    data: vec![1, 2],
                    has_more: None,
                    last_id: Some("2".to_owned()),
                })
            }
        }

        assert_eq!(collect_pages(OnePage, 100, None).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_zero_limit_never_fetches() {
        let mut numbers = Numbers::new(10);

        let items = collect_pages(&mut numbers, 100, Some(0)).unwrap();

        assert!(items.is_empty());
        assert!(numbers.requests.is_empty());
    }

    #[test]
    fn test_empty_page_ends_the_loop() {
        /// Claims more pages forever without returning any item.
        struct Empty {
            fetches: usize,
        }

        impl PageSource for &mut Empty {
            type Item = u8;
            type Error = ();

            fn fetch(&mut self, _: &PageRequest) -> Result<Page<u8>, ()> {
                self.fetches += 1;
                Ok(Page {
                    data: Vec::new(),
                    has_more: Some(true),
                    last_id: None,
                })
            }
        }

        let mut empty = Empty { fetches: 0 };

        assert_eq!(collect_pages(&mut empty, 0, Some(5)).unwrap(), Vec::<u8>::new());
        assert_eq!(empty.fetches, 1);
    }

    #[test]
    fn test_fetch_errors_propagate() {
        struct Failing;

        impl PageSource for Failing {
            type Item = u8;
            type Error = &'static str;

            fn fetch(&mut self, _: &PageRequest) -> Result<Page<u8>, &'static str> {
                Err("boom")
            }
        }

        let mut paginator = Paginator::new(Failing, 10, None);
        assert_eq!(paginator.step(), Err("boom"));
    }
}

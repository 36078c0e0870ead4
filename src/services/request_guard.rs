/// Latest-wins guard for overlapping fetches of the same data.
///
/// Each fetch takes a [`Ticket`] before it goes out; when the response comes
/// back it is applied only if no newer ticket has been issued since.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestGuard {
    current: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestGuard {
    pub fn issue(&mut self) -> Ticket {
        self.current += 1;
        Ticket(self.current)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current == ticket.0
    }

    /// Makes every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }
}

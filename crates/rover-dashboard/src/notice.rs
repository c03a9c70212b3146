//! Transient notices shown at the bottom of the page

use std::time::{Duration, Instant};

use crate::elements;
use crate::surface::Surface;

/// Time between the slide-out and the removal of the element
const SLIDE_OUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// `None` when the lifetime reaches past what `Instant` can represent
    Shown { expires_at: Option<Instant> },
    Leaving { remove_at: Instant },
}

#[derive(Debug, Clone)]
struct Notice {
    id: u64,
    element: String,
    phase: Phase,
}

/// Owns the notices currently on screen
#[derive(Debug)]
pub struct NoticeBoard {
    lifetime: Duration,
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            next_id: 0,
            notices: Vec::new(),
        }
    }

    /// Show a notice; returns its id for [`NoticeBoard::dismiss`]
    pub fn show(&mut self, title: &str, body: &str, now: Instant, surface: &mut dyn Surface) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        let element = format!("notice-{}", id);
        surface.append_child(elements::BODY, &element, &["dialog"]);
        surface.append_child(&element, &format!("{}-close", element), &["close"]);
        surface.set_text(&format!("{}-close", element), "expand_more");
        surface.append_child(&element, &format!("{}-title", element), &[]);
        surface.set_text(&format!("{}-title", element), title);
        surface.append_child(&element, &format!("{}-body", element), &[]);
        surface.set_text(&format!("{}-body", element), body);

        self.notices.push(Notice {
            id,
            element,
            phase: Phase::Shown {
                expires_at: now.checked_add(self.lifetime),
            },
        });
        id
    }

    /// Slide a notice out ahead of its expiry. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64, now: Instant, surface: &mut dyn Surface) {
        if let Some(notice) = self.notices.iter_mut().find(|n| n.id == id) {
            if let Phase::Shown { .. } = notice.phase {
                slide_out(notice, now, surface);
            }
        }
    }

    /// Advance all notices to `now`
    pub fn expire(&mut self, now: Instant, surface: &mut dyn Surface) {
        for notice in self.notices.iter_mut() {
            if let Phase::Shown {
                expires_at: Some(expires_at),
            } = notice.phase
            {
                if now >= expires_at {
                    slide_out(notice, now, surface);
                }
            }
        }

        self.notices.retain(|notice| match notice.phase {
            Phase::Leaving { remove_at } if now >= remove_at => {
                surface.remove(&notice.element);
                false
            }
            _ => true,
        });
    }

    /// Number of notices still attached to the page
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

fn slide_out(notice: &mut Notice, now: Instant, surface: &mut dyn Surface) {
    surface.set_style(&notice.element, "bottom", "-100%");
    notice.phase = Phase::Leaving {
        remove_at: now + SLIDE_OUT,
    };
}

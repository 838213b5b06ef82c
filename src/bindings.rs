//! Event-handler closures for UI hosts.
//!
//! Widgets want callbacks, not a `&mut ViewComposer`. `Handlers` shares the
//! composer through `Rc<RefCell<_>>` and hands out closures that each borrow
//! it mutably for the duration of one event.

use crate::error::Result;
use crate::messages::ViewMessage;
use crate::state::FilterValue;
use crate::value::RecordId;
use crate::view::ViewComposer;
use std::cell::RefCell;
use std::rc::Rc;

pub struct Handlers<T> {
    view: Rc<RefCell<ViewComposer<T>>>,
}

impl<T> Handlers<T> {
    pub fn new(view: ViewComposer<T>) -> Self {
        Handlers {
            view: Rc::new(RefCell::new(view)),
        }
    }

    pub fn from_shared(view: Rc<RefCell<ViewComposer<T>>>) -> Self {
        Handlers { view }
    }

    pub fn view(&self) -> Rc<RefCell<ViewComposer<T>>> {
        Rc::clone(&self.view)
    }

    pub fn on_search_change(&self) -> impl Fn(&str) {
        let view = Rc::clone(&self.view);
        move |term: &str| view.borrow_mut().set_search_term(term)
    }

    /// Dropdown change. Passing the sentinel clears the filter.
    pub fn on_filter_change(&self) -> impl Fn(&str, &str) -> Result<()> {
        let view = Rc::clone(&self.view);
        move |filter_id: &str, value: &str| {
            view.borrow_mut()
                .set_filter(filter_id, FilterValue::One(value.to_string()))
        }
    }

    pub fn on_sort(&self) -> impl Fn(&str) -> Result<()> {
        let view = Rc::clone(&self.view);
        move |field: &str| view.borrow_mut().set_sort(field)
    }

    pub fn on_toggle_select(&self) -> impl Fn(RecordId) {
        let view = Rc::clone(&self.view);
        move |id: RecordId| view.borrow_mut().toggle_select(id)
    }

    pub fn on_toggle_select_all(&self) -> impl Fn() {
        let view = Rc::clone(&self.view);
        move || view.borrow_mut().toggle_select_all()
    }

    /// The action runs while the composer is borrowed; it must not call
    /// other handlers from the same `Handlers`.
    pub fn on_bulk_action(&self) -> impl Fn(&str) -> Result<usize> {
        let view = Rc::clone(&self.view);
        move |action_id: &str| view.borrow().dispatch_bulk_action(action_id)
    }

    pub fn on_message(&self) -> impl Fn(ViewMessage) -> Result<()> {
        let view = Rc::clone(&self.view);
        move |message: ViewMessage| view.borrow_mut().apply(message)
    }
}

impl<T> Clone for Handlers<T> {
    fn clone(&self) -> Self {
        Handlers {
            view: Rc::clone(&self.view),
        }
    }
}

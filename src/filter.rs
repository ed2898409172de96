use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::record::Record;

/// A labelled record predicate. Cloning shares the closure.
#[derive(Clone)]
pub struct FilterPredicate {
    label: String,
    test: Rc<dyn Fn(&Record) -> bool>,
}

impl FilterPredicate {
    pub fn new(label: impl Into<String>, test: impl Fn(&Record) -> bool + 'static) -> Self {
        Self {
            label: label.into(),
            test: Rc::new(test),
        }
    }

    pub fn country(name: &str) -> Self {
        let wanted = name.to_string();
        Self::new(format!("creatorCountry == {name:?}"), move |record: &Record| {
            record.country() == Some(wanted.as_str())
        })
    }

    pub fn depicts(tag: &str) -> Self {
        let wanted = tag.to_string();
        Self::new(format!("depicts contains {tag:?}"), move |record: &Record| {
            record.depicts.iter().any(|t| *t == wanted)
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, record: &Record) -> bool {
        (self.test)(record)
    }
}

impl fmt::Debug for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilterPredicate").field(&self.label).finish()
    }
}

/// What a view asks the coordinator to do after an interaction.
#[derive(Debug, Clone)]
pub enum FilterCommand {
    Set(FilterPredicate),
    Clear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterState {
    Unfiltered,
    Filtered(String),
}

/// Receives the effective dataset every time the filter changes.
pub trait FilterListener {
    fn on_filter(&mut self, records: &[&Record]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Owns the dataset and the single active predicate, and pushes the
/// filtered view of the data to every subscriber.
pub struct CrossFilter {
    records: Rc<[Record]>,
    active: Option<FilterPredicate>,
    listeners: Vec<(SubscriberId, Rc<RefCell<dyn FilterListener>>)>,
    next_id: usize,
}

impl CrossFilter {
    pub fn new(records: impl Into<Rc<[Record]>>) -> Self {
        Self {
            records: records.into(),
            active: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn records(&self) -> &Rc<[Record]> {
        &self.records
    }

    pub fn state(&self) -> FilterState {
        match &self.active {
            Some(predicate) => FilterState::Filtered(predicate.label().to_string()),
            None => FilterState::Unfiltered,
        }
    }

    pub fn active(&self) -> Option<&FilterPredicate> {
        self.active.as_ref()
    }

    pub fn effective_records(&self) -> Vec<&Record> {
        match &self.active {
            Some(predicate) => self
                .records
                .iter()
                .filter(|record| predicate.matches(record))
                .collect(),
            None => self.records.iter().collect(),
        }
    }

    /// Registers a listener and hands it the current effective dataset.
    pub fn subscribe(&mut self, listener: Rc<RefCell<dyn FilterListener>>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        {
            let effective = self.effective_records();
            listener.borrow_mut().on_filter(&effective);
        }
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Replaces the active predicate (or clears it with `None`) and notifies
    /// every listener before returning.
    pub fn set_filter(&mut self, predicate: Option<FilterPredicate>) {
        self.active = predicate;
        let effective = self.effective_records();
        debug!(
            state = ?self.state(),
            records = effective.len(),
            listeners = self.listeners.len(),
            "filter changed"
        );
        for (_, listener) in &self.listeners {
            listener.borrow_mut().on_filter(&effective);
        }
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(None);
    }

    pub fn apply(&mut self, command: FilterCommand) {
        match command {
            FilterCommand::Set(predicate) => self.set_filter(Some(predicate)),
            FilterCommand::Clear => self.clear_filter(),
        }
    }
}

impl fmt::Debug for CrossFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrossFilter")
            .field("records", &self.records.len())
            .field("active", &self.active)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Vec<String>>,
    }

    impl FilterListener for Recorder {
        fn on_filter(&mut self, records: &[&Record]) {
            self.seen.push(
                records
                    .iter()
                    .map(|record| record.country().unwrap_or_default().to_string())
                    .collect(),
            );
        }
    }

    fn dataset() -> Vec<Record> {
        vec![
            Record::new("France", &["cat", "dog"]),
            Record::new("France", &["cat"]),
            Record::new("Spain", &["dog"]),
        ]
    }

    #[test]
    fn starts_unfiltered_and_notifies_on_subscribe() {
        let mut filter = CrossFilter::new(dataset());
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        filter.subscribe(recorder.clone());
        assert_eq!(filter.state(), FilterState::Unfiltered);
        assert_eq!(recorder.borrow().seen, vec![vec!["France", "France", "Spain"]]);
    }

    #[test]
    fn new_predicate_replaces_old_one() {
        let mut filter = CrossFilter::new(dataset());
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        filter.subscribe(recorder.clone());

        filter.set_filter(Some(FilterPredicate::country("France")));
        filter.set_filter(Some(FilterPredicate::country("Spain")));
        assert_eq!(filter.effective_records().len(), 1);
        assert_eq!(
            filter.state(),
            FilterState::Filtered("creatorCountry == \"Spain\"".to_string())
        );
        assert_eq!(recorder.borrow().seen.last().unwrap(), &vec!["Spain"]);
    }

    #[test]
    fn setting_the_same_predicate_twice_is_idempotent() {
        let mut filter = CrossFilter::new(dataset());
        let predicate = FilterPredicate::depicts("cat");
        filter.set_filter(Some(predicate.clone()));
        let once: Vec<Record> = filter.effective_records().into_iter().cloned().collect();
        filter.set_filter(Some(predicate));
        let twice: Vec<Record> = filter.effective_records().into_iter().cloned().collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn clear_restores_everything() {
        let mut filter = CrossFilter::new(dataset());
        filter.apply(FilterCommand::Set(FilterPredicate::country("Spain")));
        filter.apply(FilterCommand::Clear);
        assert_eq!(filter.state(), FilterState::Unfiltered);
        assert_eq!(filter.effective_records().len(), 3);
    }

    #[test]
    fn unsubscribed_listeners_stop_hearing() {
        let mut filter = CrossFilter::new(dataset());
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let id = filter.subscribe(recorder.clone());
        assert!(filter.unsubscribe(id));
        assert!(!filter.unsubscribe(id));
        filter.set_filter(Some(FilterPredicate::country("Spain")));
        assert_eq!(recorder.borrow().seen.len(), 1);
    }
}

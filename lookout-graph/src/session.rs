//! Search session state.
//!
//! `SearchState` is the whole state of one search box: the query, the
//! ordered result ids, the keyboard highlight and the current selection.
//! It never changes in place. `SearchState::apply` takes an event and
//! returns the next state plus the selection it produced, if any, so a
//! host can keep the state wherever it likes.
//!
//! `SearchSession` is the convenience wrapper for hosts that just want to
//! push events and get an `on_select` callback.

use crate::matcher::NodeMatch;
use crate::search_index::SearchIndex;
use lookout_core::{GraphNode, GraphNodes};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shown in place of the result list when a non-empty query matches nothing.
pub const NO_RESULTS_TEXT: &str = "No results found";

/// Where the search box is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing typed yet.
    Idle,
    /// A query is in place and results follow it.
    Filtering,
    /// The user picked a result.
    Selected,
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The input text changed.
    QueryChanged(String),
    /// Arrow down.
    HighlightNext,
    /// Arrow up.
    HighlightPrevious,
    /// Enter on the highlighted result.
    Confirm,
    /// Click on the result at this position.
    Click(usize),
    /// Clear the box.
    Reset,
}

/// A picked node, handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: String,
    pub node: GraphNode,
}

/// The state of one search box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    query: String,
    results: Vec<String>,
    highlighted: Option<usize>,
    selected: Option<String>,
}

/// The outcome of applying an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SearchState,
    pub selection: Option<Selection>,
}

impl SearchState {
    /// The starting state: empty query, every node listed.
    pub fn new(index: &SearchIndex) -> Self {
        Self::with_query(String::new(), index)
    }

    fn with_query(query: String, index: &SearchIndex) -> Self {
        let results = index
            .search(&query)
            .into_iter()
            .map(|m| m.id.to_string())
            .collect();
        Self {
            query,
            results,
            highlighted: None,
            selected: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Result ids in display order.
    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.selected.is_some() {
            Phase::Selected
        } else if self.query.is_empty() {
            Phase::Idle
        } else {
            Phase::Filtering
        }
    }

    /// The text to show instead of the list, if any.
    pub fn empty_results_text(&self) -> Option<&'static str> {
        (self.results.is_empty() && !self.query.is_empty()).then_some(NO_RESULTS_TEXT)
    }

    /// Applies one event.
    pub fn apply(&self, event: SearchEvent, index: &SearchIndex) -> Transition {
        let mut next = self.clone();
        let mut selection = None;

        match event {
            SearchEvent::QueryChanged(query) => {
                if query != self.query {
                    // Any edit drops the selection, even if the node is still listed
                    next = Self::with_query(query, index);
                }
            }
            SearchEvent::HighlightNext => {
                next.highlighted = step(self.highlighted, self.results.len(), true);
            }
            SearchEvent::HighlightPrevious => {
                next.highlighted = step(self.highlighted, self.results.len(), false);
            }
            SearchEvent::Confirm => {
                if let Some(position) = self.highlighted {
                    selection = next.select(position, index);
                }
            }
            SearchEvent::Click(position) => {
                selection = next.select(position, index);
            }
            SearchEvent::Reset => {
                next = Self::new(index);
            }
        }

        debug!(
            "Search {:?} -> {:?} ({} results)",
            self.phase(),
            next.phase(),
            next.results.len()
        );

        Transition {
            state: next,
            selection,
        }
    }

    fn select(&mut self, position: usize, index: &SearchIndex) -> Option<Selection> {
        let Some(id) = self.results.get(position) else {
            debug!(
                "Ignoring selection of result {} of {}",
                position,
                self.results.len()
            );
            return None;
        };
        let node = index.get(id)?.clone();
        let id = id.clone();

        self.highlighted = Some(position);
        self.selected = Some(id.clone());
        Some(Selection { id, node })
    }
}

/// Moves a highlight one step, wrapping at both ends.
fn step(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    })
}

/// A search box bound to a node collection and a selection callback.
pub struct SearchSession<F>
where
    F: FnMut(&Selection),
{
    index: SearchIndex,
    state: SearchState,
    on_select: F,
}

impl<F> SearchSession<F>
where
    F: FnMut(&Selection),
{
    /// Starts a session over `nodes`.
    pub fn new(nodes: GraphNodes, on_select: F) -> Self {
        let index = SearchIndex::new(nodes);
        let state = SearchState::new(&index);
        Self {
            index,
            state,
            on_select,
        }
    }

    /// Applies an event, calling `on_select` once if it picked a node.
    ///
    /// Returns the selection that was emitted.
    pub fn dispatch(&mut self, event: SearchEvent) -> Option<Selection> {
        let Transition { state, selection } = self.state.apply(event, &self.index);
        self.state = state;
        if let Some(selection) = &selection {
            (self.on_select)(selection);
        }
        selection
    }

    /// Sets the query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.dispatch(SearchEvent::QueryChanged(query.into()));
    }

    /// Replaces the node collection and starts over.
    pub fn refresh(&mut self, nodes: GraphNodes) {
        self.index = SearchIndex::new(nodes);
        self.state = SearchState::new(&self.index);
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// The current results with their nodes.
    pub fn results(&self) -> Vec<NodeMatch<'_>> {
        self.state
            .results
            .iter()
            .filter_map(|id| {
                let (id, node) = self.index.nodes().get_key_value(id)?;
                Some(NodeMatch { id, node })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn fixture() -> GraphNodes {
        let mut nodes = GraphNodes::new();
        nodes.insert("1".into(), GraphNode::new("computer_node", "Computer", "001"));
        nodes.insert("2".into(), GraphNode::new("user_node", "User", "002"));
        nodes.insert("3".into(), GraphNode::new("group_node", "Group", "003"));
        nodes
    }

    fn query(q: &str) -> SearchEvent {
        SearchEvent::QueryChanged(q.to_string())
    }

    #[test]
    fn test_starts_idle_with_full_list() {
        let index = SearchIndex::new(fixture());
        let state = SearchState::new(&index);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.query(), "");
        assert_eq!(state.results(), ["1", "3", "2"]);
        assert_eq!(state.empty_results_text(), None);
    }

    #[test]
    fn test_query_change_filters() {
        let index = SearchIndex::new(fixture());
        let state = SearchState::new(&index);

        let t = state.apply(query("computer"), &index);
        assert_eq!(t.state.phase(), Phase::Filtering);
        assert_eq!(t.state.results(), ["1"]);
        assert!(t.selection.is_none());

        let t = t.state.apply(query(""), &index);
        assert_eq!(t.state.phase(), Phase::Idle);
        assert_eq!(t.state.results().len(), 3);
    }

    #[test]
    fn test_no_results_text() {
        let index = SearchIndex::new(fixture());
        let t = SearchState::new(&index).apply(query("specterops"), &index);
        assert!(t.state.results().is_empty());
        assert_eq!(t.state.empty_results_text(), Some(NO_RESULTS_TEXT));

        let empty = SearchIndex::new(GraphNodes::new());
        assert_eq!(SearchState::new(&empty).empty_results_text(), None);
    }

    #[test]
    fn test_click_selects_full_record() {
        let nodes = fixture();
        let index = SearchIndex::new(nodes.clone());
        let t = SearchState::new(&index).apply(query("computer"), &index);
        let t = t.state.apply(SearchEvent::Click(0), &index);

        assert_eq!(t.state.phase(), Phase::Selected);
        assert_eq!(t.state.selected(), Some("1"));
        assert_eq!(
            t.selection,
            Some(Selection {
                id: "1".into(),
                node: nodes["1"].clone(),
            })
        );
    }

    #[test]
    fn test_click_out_of_range_is_ignored() {
        let index = SearchIndex::new(fixture());
        let state = SearchState::new(&index).apply(query("computer"), &index).state;
        let t = state.apply(SearchEvent::Click(1), &index);
        assert!(t.selection.is_none());
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_highlight_wraps_and_confirm_selects() {
        let index = SearchIndex::new(fixture());
        let mut state = SearchState::new(&index);

        // Confirm with nothing highlighted does nothing
        let t = state.apply(SearchEvent::Confirm, &index);
        assert!(t.selection.is_none());

        state = state.apply(SearchEvent::HighlightPrevious, &index).state;
        assert_eq!(state.highlighted(), Some(2));
        state = state.apply(SearchEvent::HighlightNext, &index).state;
        assert_eq!(state.highlighted(), Some(0));
        state = state.apply(SearchEvent::HighlightNext, &index).state;
        assert_eq!(state.highlighted(), Some(1));

        let t = state.apply(SearchEvent::Confirm, &index);
        let selection = t.selection.unwrap();
        assert_eq!(selection.id, "3");
        assert_eq!(selection.node.label, "group_node");
    }

    #[test]
    fn test_highlight_on_empty_results() {
        let index = SearchIndex::new(fixture());
        let state = SearchState::new(&index).apply(query("zzz"), &index).state;
        let state = state.apply(SearchEvent::HighlightNext, &index).state;
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn test_query_change_clears_stale_selection() {
        let index = SearchIndex::new(fixture());
        let state = SearchState::new(&index).apply(query("computer"), &index).state;
        let state = state.apply(SearchEvent::Click(0), &index).state;
        assert_eq!(state.phase(), Phase::Selected);

        let t = state.apply(query("user"), &index);
        assert_eq!(t.state.phase(), Phase::Filtering);
        assert_eq!(t.state.selected(), None);
        assert_eq!(t.state.highlighted(), None);
        assert!(!t.state.results().contains(&"1".to_string()));
    }

    #[test]
    fn test_any_query_edit_clears_selection() {
        let index = SearchIndex::new(fixture());
        let state = SearchState::new(&index).apply(query("comp"), &index).state;
        let state = state.apply(SearchEvent::Click(0), &index).state;

        // Still listed, but the selection goes anyway
        let t = state.apply(query("compu"), &index);
        assert_eq!(t.state.results(), ["1"]);
        assert_eq!(t.state.selected(), None);

        // Same text is not an edit
        let same = state.apply(query("comp"), &index);
        assert_eq!(same.state, state);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let index = SearchIndex::new(fixture());
        let state = SearchState::new(&index).apply(query("user"), &index).state;
        let state = state.apply(SearchEvent::Click(0), &index).state;
        let t = state.apply(SearchEvent::Reset, &index);
        assert_eq!(t.state, SearchState::new(&index));
    }

    #[test]
    fn test_session_fires_callback_once_per_selection() {
        let nodes = fixture();
        let picked: RefCell<Vec<Selection>> = RefCell::new(Vec::new());
        let mut session = SearchSession::new(nodes.clone(), |s: &Selection| {
            picked.borrow_mut().push(s.clone())
        });

        session.set_query("computer");
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].node.label, "computer_node");

        let emitted = session.dispatch(SearchEvent::Click(0));
        session.dispatch(SearchEvent::HighlightNext);
        session.set_query("user");
        session.dispatch(SearchEvent::Confirm);

        let picked = picked.borrow();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, "1");
        assert_eq!(picked[0].node, nodes["1"]);
        assert_eq!(emitted.as_ref(), Some(&picked[0]));
    }

    #[test]
    fn test_session_refresh_rebuilds() {
        let mut session = SearchSession::new(fixture(), |_: &Selection| {});
        session.set_query("node");
        session.dispatch(SearchEvent::Click(0));

        let mut nodes = GraphNodes::new();
        nodes.insert("9".into(), GraphNode::new("dc01", "Computer", "009"));
        session.refresh(nodes);

        assert_eq!(session.state().phase(), Phase::Idle);
        assert_eq!(session.state().results(), ["9"]);
        assert_eq!(session.index().len(), 1);
    }
}

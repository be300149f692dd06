//! Directory view state and text rendering.
//!
//! The view starts out `Loading`, performs one fetch, and then shows either an
//! error or the employees grouped by area. At most one employee is selected
//! for the details overlay at a time.

use std::fmt;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::EmployeeSource;
use crate::models::EmployeeRecord;

/// Employees sharing one area, in the order they were received
#[derive(Debug, Clone, PartialEq)]
pub struct AreaGroup {
    pub area: String,
    pub employees: Vec<EmployeeRecord>,
}

/// Groups employees by area. Groups follow the first appearance of each area
/// and members keep their input order.
pub fn group_by_area(employees: &[EmployeeRecord]) -> Vec<AreaGroup> {
    let mut groups: Vec<AreaGroup> = Vec::new();
    for employee in employees {
        match groups.iter_mut().find(|group| group.area == employee.area) {
            Some(group) => group.employees.push(employee.clone()),
            None => groups.push(AreaGroup {
                area: employee.area.clone(),
                employees: vec![employee.clone()],
            }),
        }
    }
    groups
}

/// How the details overlay was dismissed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Button,
    Backdrop,
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Failed(String),
    Ready {
        groups: Vec<AreaGroup>,
        selected: Option<EmployeeRecord>,
    },
}

#[derive(Debug, Clone)]
pub struct DirectoryView {
    state: ViewState,
}

impl Default for DirectoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Fetches the active employees once.
    ///
    /// Returns `false` without touching the state when `cancel` fires first.
    pub async fn load<S>(&mut self, source: &S, cancel: &CancellationToken) -> bool
    where
        S: EmployeeSource + ?Sized,
    {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Directory view torn down before the fetch completed");
                return false;
            }
            result = source.fetch_employees() => result,
        };

        self.state = match outcome {
            Ok(employees) => ViewState::Ready {
                groups: group_by_area(&employees),
                selected: None,
            },
            Err(err) => ViewState::Failed(err.to_string()),
        };
        true
    }

    /// Opens the details overlay for `id`. Returns `false` if no such employee
    /// is displayed.
    pub fn select(&mut self, id: Uuid) -> bool {
        let ViewState::Ready { groups, selected } = &mut self.state else {
            return false;
        };

        let found = groups
            .iter()
            .flat_map(|group| group.employees.iter())
            .find(|employee| employee.id == id)
            .cloned();

        match found {
            Some(employee) => {
                *selected = Some(employee);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self, reason: CloseReason) {
        if let ViewState::Ready { selected, .. } = &mut self.state
            && selected.take().is_some()
        {
            tracing::debug!(?reason, "Employee details closed");
        }
    }

    pub fn selected(&self) -> Option<&EmployeeRecord> {
        match &self.state {
            ViewState::Ready { selected, .. } => selected.as_ref(),
            _ => None,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn write_area(f: &mut fmt::Formatter<'_>, area: &str, employees: &[EmployeeRecord]) -> fmt::Result {
    if employees.is_empty() {
        return writeln!(f, "No employees in {}", area);
    }

    let noun = if employees.len() == 1 {
        "employee"
    } else {
        "employees"
    };
    writeln!(f, "{} ({} {})", area, employees.len(), noun)?;
    for employee in employees {
        writeln!(
            f,
            "  - {} | Area: {} | Seniority: {} years",
            employee.full_name, employee.area, employee.seniority
        )?;
    }
    Ok(())
}

fn write_details(f: &mut fmt::Formatter<'_>, employee: &EmployeeRecord) -> fmt::Result {
    let status = if employee.is_active {
        "Active"
    } else {
        "Inactive"
    };
    writeln!(f, "Employee Details")?;
    writeln!(f, "  Full name: {}", employee.full_name)?;
    writeln!(f, "  Status: {}", status)?;
    writeln!(f, "  Age: {}", employee.age)?;
    writeln!(f, "  Area: {}", employee.area)?;
    writeln!(f, "  Seniority: {} years", employee.seniority)?;
    writeln!(f, "  Phone: {}", employee.phone)
}

/// Renders one area section on its own
pub fn render_area(area: &str, employees: &[EmployeeRecord]) -> String {
    struct Area<'a>(&'a str, &'a [EmployeeRecord]);

    impl fmt::Display for Area<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_area(f, self.0, self.1)
        }
    }

    Area(area, employees).to_string()
}

impl fmt::Display for DirectoryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Employee Directory")?;
        writeln!(f)?;

        match &self.state {
            ViewState::Loading => writeln!(f, "Loading employees..."),
            ViewState::Failed(message) => writeln!(f, "Error: {}", message),
            ViewState::Ready { groups, selected } => {
                for group in groups {
                    write_area(f, &group.area, &group.employees)?;
                    writeln!(f)?;
                }
                if let Some(employee) = selected {
                    write_details(f, employee)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, ClientResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn employee(name: &str, area: &str) -> EmployeeRecord {
        EmployeeRecord {
            id: Uuid::new_v4(),
            full_name: name.to_string(),
            age: 30,
            area: area.to_string(),
            seniority: 2,
            phone: "555-1".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    struct StaticSource {
        employees: Vec<EmployeeRecord>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmployeeSource for StaticSource {
        async fn fetch_employees(&self) -> ClientResult<Vec<EmployeeRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.employees.clone())
        }
    }

    struct TimeoutSource;

    #[async_trait]
    impl EmployeeSource for TimeoutSource {
        async fn fetch_employees(&self) -> ClientResult<Vec<EmployeeRecord>> {
            Err(ClientError::Timeout)
        }
    }

    struct NeverSource;

    #[async_trait]
    impl EmployeeSource for NeverSource {
        async fn fetch_employees(&self) -> ClientResult<Vec<EmployeeRecord>> {
            std::future::pending().await
        }
    }

    async fn ready_view(employees: Vec<EmployeeRecord>) -> DirectoryView {
        let source = StaticSource {
            employees,
            calls: AtomicUsize::new(0),
        };
        let mut view = DirectoryView::new();
        assert!(view.load(&source, &CancellationToken::new()).await);
        view
    }

    #[test]
    fn test_group_by_area_keeps_first_seen_order() {
        let a = employee("A", "IT");
        let b = employee("B", "HR");
        let c = employee("C", "IT");

        let groups = group_by_area(&[a.clone(), b.clone(), c.clone()]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].area, "IT");
        assert_eq!(groups[0].employees, vec![a, c]);
        assert_eq!(groups[1].area, "HR");
        assert_eq!(groups[1].employees, vec![b]);
    }

    #[test]
    fn test_group_by_area_empty() {
        assert!(group_by_area(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_load_fetches_once_and_groups() {
        let source = StaticSource {
            employees: vec![employee("A", "IT"), employee("B", "HR")],
            calls: AtomicUsize::new(0),
        };
        let mut view = DirectoryView::new();
        assert_eq!(view.state(), &ViewState::Loading);

        assert!(view.load(&source, &CancellationToken::new()).await);

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        match view.state() {
            ViewState::Ready { groups, selected } => {
                assert_eq!(groups.len(), 2);
                assert!(selected.is_none());
            }
            other => panic!("unexpected state: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_failure_replaces_data_view() {
        let mut view = DirectoryView::new();
        assert!(view.load(&TimeoutSource, &CancellationToken::new()).await);

        assert_eq!(
            view.state(),
            &ViewState::Failed("The request took too long".to_string())
        );
        assert!(view.render().contains("Error: The request took too long"));
        assert!(!view.render().contains("employees)"));
    }

    #[tokio::test]
    async fn test_cancelled_load_leaves_state_untouched() {
        let cancel = CancellationToken::new();
        let mut view = DirectoryView::new();

        let child = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            child.cancel();
        });

        assert!(!view.load(&NeverSource, &cancel).await);
        assert_eq!(view.state(), &ViewState::Loading);
    }

    #[tokio::test]
    async fn test_already_cancelled_never_fetches() {
        let source = StaticSource {
            employees: vec![employee("A", "IT")],
            calls: AtomicUsize::new(0),
        };
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut view = DirectoryView::new();
        assert!(!view.load(&source, &cancel).await);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(view.state(), &ViewState::Loading);
    }

    #[tokio::test]
    async fn test_select_and_close() {
        let ana = employee("Ana Gomez", "IT");
        let luis = employee("Luis Perez", "HR");
        let mut view = ready_view(vec![ana.clone(), luis.clone()]).await;

        assert!(view.select(ana.id));
        assert_eq!(view.selected(), Some(&ana));

        assert!(view.select(luis.id));
        assert_eq!(view.selected(), Some(&luis));

        assert!(!view.select(Uuid::new_v4()));
        assert_eq!(view.selected(), Some(&luis));

        for reason in [CloseReason::Button, CloseReason::Backdrop, CloseReason::Escape] {
            view.select(ana.id);
            view.close(reason);
            assert!(view.selected().is_none());
        }
    }

    #[test]
    fn test_select_while_loading_is_ignored() {
        let mut view = DirectoryView::new();
        assert!(!view.select(Uuid::new_v4()));
        assert!(view.render().contains("Loading employees..."));
    }

    #[tokio::test]
    async fn test_render_sections_and_details() {
        let mut ana = employee("Ana Gomez", "IT");
        ana.is_active = false;
        let mut view = ready_view(vec![
            ana.clone(),
            employee("Carla Ruiz", "IT"),
            employee("Luis Perez", "HR"),
        ])
        .await;

        let text = view.render();
        assert!(text.starts_with("Employee Directory"));
        assert!(text.contains("IT (2 employees)"));
        assert!(text.contains("HR (1 employee)"));
        assert!(text.contains("  - Ana Gomez | Area: IT | Seniority: 2 years"));
        assert!(text.find("IT (").unwrap() < text.find("HR (").unwrap());
        assert!(!text.contains("Employee Details"));

        view.select(ana.id);
        let text = view.render();
        assert!(text.contains("Employee Details"));
        assert!(text.contains("  Status: Inactive"));
        assert!(text.contains("  Phone: 555-1"));
    }

    #[test]
    fn test_render_empty_area() {
        assert_eq!(render_area("Finance", &[]), "No employees in Finance\n");
    }
}

use rusqlite::Connection;
use std::cell::Cell;
use std::rc::Rc;
use taskly_core::db::open_db_in_memory;
use taskly_core::{
    config, AdsGateway, BillingGateway, NoopAds, NoopBilling, PlannerError, PlannerService,
    ProjectDraft, PurchaseOutcome, QuotaResource, SqliteProjectRepository,
    SqliteSettingsRepository, SqliteTaskRepository, TaskDraft, ValidationError,
};

const HOUR_MS: i64 = 60 * 60 * 1000;

type Planner<'conn> = PlannerService<
    SqliteProjectRepository<'conn>,
    SqliteTaskRepository<'conn>,
    SqliteSettingsRepository<'conn>,
>;

fn planner(conn: &Connection) -> Planner<'_> {
    planner_with_gateways(conn, Box::new(NoopAds), Box::new(NoopBilling))
}

fn planner_with_gateways<'conn>(
    conn: &'conn Connection,
    ads: Box<dyn AdsGateway>,
    billing: Box<dyn BillingGateway>,
) -> Planner<'conn> {
    PlannerService::new(
        SqliteProjectRepository::new(conn),
        SqliteTaskRepository::new(conn),
        SqliteSettingsRepository::new(conn),
        ads,
        billing,
    )
    .unwrap()
}

fn project_draft(name: &str) -> ProjectDraft {
    ProjectDraft {
        name: name.to_string(),
        description: "quota fixture".to_string(),
        background: None,
        due_date: None,
    }
}

fn task_draft(name: &str) -> TaskDraft {
    let now = taskly_core::calendar::now_ms();
    TaskDraft {
        name: name.to_string(),
        description: "quota fixture".to_string(),
        project_id: None,
        start_at: now,
        end_at: now + HOUR_MS,
    }
}

struct FixedBilling {
    outcome: PurchaseOutcome,
}

impl BillingGateway for FixedBilling {
    fn purchase(&self, product_id: &str) -> PurchaseOutcome {
        assert_eq!(product_id, config::PREMIUM_PRODUCT_ID);
        self.outcome
    }

    fn restore(&self) -> PurchaseOutcome {
        self.outcome
    }
}

struct PremiumProbe {
    premium: Rc<Cell<bool>>,
}

impl AdsGateway for PremiumProbe {
    fn load(&self) {}
    fn show(&self) {}
    fn set_premium(&self, premium: bool) {
        self.premium.set(premium);
    }
}

#[test]
fn free_tier_allows_one_project_and_rejects_the_second() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = planner(&conn);

    planner.create_project(project_draft("First")).unwrap();
    let err = planner.create_project(project_draft("Second")).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Quota {
            resource: QuotaResource::Projects,
            limit: 1,
        }
    ));
    assert_eq!(planner.projects().len(), 1);
}

#[test]
fn premium_removes_the_project_quota() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = planner(&conn);
    planner.set_premium(true).unwrap();

    for index in 0..5 {
        planner
            .create_project(project_draft(&format!("Project {index}")))
            .unwrap();
    }
    assert_eq!(planner.projects().len(), 5);
}

#[test]
fn free_tier_allows_ten_tasks_and_rejects_the_eleventh() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = planner(&conn);

    for index in 0..10 {
        planner.create_task(task_draft(&format!("task-{index}"))).unwrap();
    }
    assert_eq!(planner.tasks().len(), 10);

    let err = planner.create_task(task_draft("task-10")).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Quota {
            resource: QuotaResource::Tasks,
            limit: 10,
        }
    ));
    assert_eq!(planner.tasks().len(), 10);
}

#[test]
fn blank_fields_are_rejected_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = planner(&conn);

    let err = planner.create_project(project_draft("   ")).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Validation(ValidationError::BlankName)
    ));

    let mut draft = task_draft("named");
    draft.description = " \t ".to_string();
    let err = planner.create_task(draft).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Validation(ValidationError::BlankDescription)
    ));

    assert!(planner.projects().is_empty());
    assert!(planner.tasks().is_empty());
}

#[test]
fn successful_purchase_unlocks_premium_and_informs_ads() {
    let conn = open_db_in_memory().unwrap();
    let premium_seen = Rc::new(Cell::new(false));
    let mut planner = planner_with_gateways(
        &conn,
        Box::new(PremiumProbe {
            premium: premium_seen.clone(),
        }),
        Box::new(FixedBilling {
            outcome: PurchaseOutcome::Purchased,
        }),
    );

    let outcome = planner.purchase_premium().unwrap();
    assert_eq!(outcome, PurchaseOutcome::Purchased);
    assert!(planner.is_premium());
    assert!(premium_seen.get());

    // Entitlement is durable: a fresh planner over the same store sees it.
    let reread = planner_with_gateways(&conn, Box::new(NoopAds), Box::new(NoopBilling));
    assert!(reread.is_premium());
}

#[test]
fn restore_unlocks_premium() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = planner_with_gateways(
        &conn,
        Box::new(NoopAds),
        Box::new(FixedBilling {
            outcome: PurchaseOutcome::Restored,
        }),
    );

    assert_eq!(planner.restore_purchases().unwrap(), PurchaseOutcome::Restored);
    assert!(planner.is_premium());
}

#[test]
fn failed_purchase_leaves_free_tier_in_place() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = planner_with_gateways(
        &conn,
        Box::new(NoopAds),
        Box::new(FixedBilling {
            outcome: PurchaseOutcome::Failed,
        }),
    );

    assert_eq!(planner.purchase_premium().unwrap(), PurchaseOutcome::Failed);
    assert!(!planner.is_premium());

    planner.create_project(project_draft("Only one")).unwrap();
    assert!(planner.create_project(project_draft("Too many")).is_err());
}

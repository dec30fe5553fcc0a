use crate::error::ModelError;
use crate::model::catalog::{Catalog, OffDayScope, Worker};
use crate::model::configuration::Configuration;
use crate::model::tables::{DutyRow, DutyTable, SlotCategory};
use crate::scheduler::tests::roster_mock::{date, mock_catalog, mock_off_day};

#[test]
fn catalog_interns_and_resolves_identifiers() {
    let catalog = mock_catalog(
        &[("J1", "Senior"), ("J2", "Junior")],
        &["AM", "PM", "N"],
        &["AL"],
        &[("early", &["AM"]), ("late", &["PM", "N"])],
    );
    assert_eq!(catalog.worker_count(), 2);
    let am = catalog.slot_idx("AM").unwrap();
    assert_eq!(catalog.slot_id(am), "AM");
    assert_eq!(catalog.duty_types().len(), 3);
    assert_eq!(catalog.leave_types().len(), 1);
    assert_eq!(catalog.duties_of_shift("late").unwrap().len(), 2);
    let outside = catalog.duties_outside_shift("late").unwrap();
    assert_eq!(outside, vec![catalog.slot_idx("AM").unwrap()]);

    assert_eq!(
        catalog.worker_idx("nobody").unwrap_err(),
        ModelError::UnknownWorker("nobody".into())
    );
    assert_eq!(
        catalog.slot_idx("XX").unwrap_err(),
        ModelError::UnknownSlot("XX".into())
    );
    assert_eq!(
        catalog.duties_of_shift("night").unwrap_err(),
        ModelError::UnknownShift("night".into())
    );
}

#[test]
fn catalog_rejects_shift_with_unknown_member() {
    let err = Catalog::new(
        vec![Worker::new("J1", ["Senior"])],
        vec!["AM".into()],
        vec![],
        vec![("early".into(), vec!["XX".into()])],
        mock_off_day(OffDayScope::Daily, 0, 1),
        &Configuration::default(),
    )
    .unwrap_err();
    assert_eq!(err, ModelError::UnknownSlot("XX".into()));
}

#[test]
fn worker_shuffle_is_seed_reproducible() {
    let workers = &[("J1", "Senior"), ("J2", "Senior"), ("J3", "Senior"), ("J4", "Junior")];
    let a = mock_catalog(workers, &["AM"], &[], &[]);
    let b = mock_catalog(workers, &["AM"], &[], &[]);
    let order_a: Vec<&str> = a.workers().iter().map(|w| w.id.as_ref()).collect();
    let order_b: Vec<&str> = b.workers().iter().map(|w| w.id.as_ref()).collect();
    assert_eq!(order_a, order_b);
}

#[test]
fn dummy_workers_carry_every_role() {
    let mut catalog = mock_catalog(&[("J1", "Junior")], &["AM"], &[], &[]);
    catalog.add_dummy_workers(2, vec!["Senior".into(), "Junior".into()]);
    assert_eq!(catalog.worker_count(), 3);
    let dummy = catalog.worker_idx("dummy_2").unwrap();
    assert!(catalog.worker_has_role(dummy, "Senior"));
    assert!(catalog.worker_has_role(dummy, "Junior"));
}

#[test]
fn duty_table_derives_per_date_slot_lists() {
    let d0 = date(2023, 5, 1);
    let d1 = date(2023, 5, 2);
    let table = DutyTable::new(vec![
        DutyRow::duty(d0, "AM", "morning", "r1", "Senior", 1, 2, "early"),
        DutyRow::duty(d0, "PM", "evening", "r1", "Senior", 1, 1, "late"),
        DutyRow::leave(d0, "AL", "annual leave"),
        DutyRow::duty(d1, "AM", "morning", "r1", "Senior", 2, 3, "early"),
    ]);
    let duties: Vec<&str> = table.duties_on(d0).iter().map(|s| s.as_ref()).collect();
    assert_eq!(duties, ["AM", "PM"]);
    let leaves: Vec<&str> = table.leaves_on(d0).iter().map(|s| s.as_ref()).collect();
    assert_eq!(leaves, ["AL"]);
    assert!(table.leaves_on(d1).is_empty());
    assert_eq!(table.staffing(d0, "PM"), Some((1, 1)));
    assert_eq!(table.staffing(d1, "AM"), Some((2, 3)));
    assert_eq!(table.staffing(d1, "PM"), None);
    assert_eq!(table.role_on(d0, "AM"), Some("r1"));
    assert_eq!(table.role_on(d0, "AL"), None);

    let rows: Vec<_> = table.rows_on(d0).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].category, SlotCategory::Duty);
    assert_eq!(rows[2].category, SlotCategory::Leave);
}

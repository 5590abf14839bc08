//! End-to-end rental scenarios over the flat-file layout.

use std::fs;
use std::path::Path;

use carrental::config::Backend;
use carrental::{CarStatus, Config, Error, RentalDesk, Role};

fn open_desk(dir: &Path) -> RentalDesk {
    let mut config = Config::default();
    config.storage.data_dir = Some(dir.to_path_buf());
    let desk = RentalDesk::open(config).expect("failed to open desk");
    desk.bootstrap().expect("failed to bootstrap");
    desk
}

fn read_store(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).expect("store file missing")
}

#[test]
fn fresh_boot_seeds_ten_available_cars() {
    let dir = tempfile::tempdir().unwrap();
    let desk = open_desk(dir.path());

    let available = desk.inventory().list_available().unwrap();
    assert_eq!(available.len(), 10);
    assert!(available.iter().all(|car| car.status == CarStatus::Available));

    for file in ["admins.txt", "users.txt", "cars.txt", "waiting.txt", "returned.txt"] {
        assert!(dir.path().join(file).exists(), "{file} not created");
    }
}

#[test]
fn reboot_keeps_existing_records() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cars.txt"),
        "Civic Sedan 2018 10000 Rented\nTesla EV 2024 15000 Available\n",
    )
    .unwrap();

    let desk = open_desk(dir.path());
    let cars = desk.inventory().list_all().unwrap();

    assert_eq!(cars.len(), 11);
    assert_eq!(cars[0].model, "Civic");
    assert_eq!(cars[0].status, CarStatus::Rented);
    assert_eq!(cars[1].model, "Tesla");
    assert_eq!(cars.iter().filter(|car| car.model == "Civic").count(), 1);
}

#[test]
fn signup_and_login() {
    let dir = tempfile::tempdir().unwrap();
    let desk = open_desk(dir.path());

    desk.signup(Role::User, "alice", "pw").unwrap();
    let err = desk.signup(Role::User, "alice", "pw2").unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { .. }));
    assert_eq!(read_store(dir.path(), "users.txt"), "alice pw\n");

    assert!(desk.login(Role::User, "alice", "pw").is_ok());
    assert!(matches!(
        desk.login(Role::User, "alice", "wrong"),
        Err(Error::InvalidCredentials { .. })
    ));
}

#[test]
fn add_rent_remove_tesla() {
    let dir = tempfile::tempdir().unwrap();
    let desk = open_desk(dir.path());
    desk.signup(Role::Admin, "root", "toor").unwrap();
    desk.signup(Role::User, "bob", "pw").unwrap();
    let admin = desk.login(Role::Admin, "root", "toor").unwrap();
    let bob = desk.login(Role::User, "bob", "pw").unwrap();

    desk.add_car(&admin, "Tesla", "EV", 2024, 15000.0).unwrap();
    desk.rent(&bob, "Tesla").unwrap();

    let tesla = desk.inventory().find("Tesla").unwrap();
    assert_eq!(tesla.status, CarStatus::Rented);
    assert!(read_store(dir.path(), "cars.txt").contains("Tesla EV 2024 15000 Rented\n"));
    assert_eq!(read_store(dir.path(), "waiting.txt"), "bob rented Tesla\n");

    assert_eq!(desk.remove_car(&admin, "Tesla").unwrap(), 1);
    assert!(!read_store(dir.path(), "cars.txt").contains("Tesla"));
    assert!(matches!(
        desk.rent(&bob, "Tesla"),
        Err(Error::NotAvailable { .. })
    ));
    assert_eq!(desk.waiting_log(&admin).unwrap().len(), 1);
}

#[test]
fn rent_then_return_restores_availability() {
    let dir = tempfile::tempdir().unwrap();
    let desk = open_desk(dir.path());
    desk.signup(Role::User, "bob", "pw").unwrap();
    let bob = desk.login(Role::User, "bob", "pw").unwrap();
    let cars_before = read_store(dir.path(), "cars.txt");

    desk.rent(&bob, "Corolla").unwrap();
    desk.return_car(&bob, "Corolla").unwrap();

    assert_eq!(read_store(dir.path(), "cars.txt"), cars_before);
    assert_eq!(read_store(dir.path(), "waiting.txt"), "bob rented Corolla\n");
    assert_eq!(read_store(dir.path(), "returned.txt"), "bob returned Corolla\n");
    assert!(desk.bookings(&bob).unwrap().is_empty());
}

#[test]
fn failed_rent_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let desk = open_desk(dir.path());
    desk.signup(Role::User, "bob", "pw").unwrap();
    let bob = desk.login(Role::User, "bob", "pw").unwrap();
    desk.rent(&bob, "City").unwrap();
    let cars_before = read_store(dir.path(), "cars.txt");
    let waiting_before = read_store(dir.path(), "waiting.txt");

    assert!(matches!(desk.rent(&bob, "City"), Err(Error::NotAvailable { .. })));
    assert!(matches!(desk.return_car(&bob, "Civic"), Err(Error::NotRented { .. })));

    assert_eq!(read_store(dir.path(), "cars.txt"), cars_before);
    assert_eq!(read_store(dir.path(), "waiting.txt"), waiting_before);
    assert_eq!(read_store(dir.path(), "returned.txt"), "");
}

#[test]
fn malformed_car_line_is_reported_and_removable() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("cars.txt"),
        "Civic Sedan 2018 10000 Available\nBroken Sedan\n",
    )
    .unwrap();
    let desk = open_desk(dir.path());

    desk.signup(Role::Admin, "root", "pw").unwrap();
    let admin = desk.login(Role::Admin, "root", "pw").unwrap();
    assert!(matches!(
        desk.cars(&admin, false),
        Err(Error::MalformedRecord { record: 2, .. })
    ));

    assert_eq!(desk.remove_car(&admin, "Broken").unwrap(), 1);

    let cars = desk.cars(&admin, false).unwrap();
    assert_eq!(cars.len(), 10);
    assert_eq!(cars[0].model, "Civic");
    assert_eq!(read_store(dir.path(), "admins.txt"), "root pw\n");
}

#[test]
fn sqlite_backend_runs_same_flow() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.backend = Backend::Sqlite;
    config.storage.data_dir = Some(dir.path().to_path_buf());
    let desk = RentalDesk::open(config).unwrap();
    desk.bootstrap().unwrap();
    desk.signup(Role::User, "bob", "pw").unwrap();
    let bob = desk.login(Role::User, "bob", "pw").unwrap();

    desk.rent(&bob, "Fortuner").unwrap();

    assert_eq!(desk.bookings(&bob).unwrap()[0].model, "Fortuner");
    assert_eq!(desk.rentals().waiting_log().unwrap().len(), 1);
    assert!(dir.path().join("carrental.db").exists());
    assert!(!dir.path().join("cars.txt").exists());
}

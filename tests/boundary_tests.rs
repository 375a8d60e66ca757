use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_percentage_discount_rounds_down() {
    let requests = common::csv_file(common::REQUEST_HEADER, &["1,single,,ODD15,,,"]);
    let catalog = common::csv_file("plan,price", &["single,999"]);
    let promos = common::csv_file(
        common::PROMO_HEADER,
        &["ODD15,percentage,15,,,0,,true,,"],
    );

    let mut cmd = Command::new(cargo_bin!("course-checkout"));
    cmd.arg("quote")
        .arg(requests.path())
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--promos")
        .arg(promos.path());

    // 15% of 999 is 149.85, floored to 149
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,single,1,999,149,850,C26_1_"));
}

#[test]
fn test_fixed_discount_never_goes_negative() {
    let requests = common::csv_file(common::REQUEST_HEADER, &["1,single,,BIG,,,"]);
    let catalog = common::csv_file("plan,price", &["single,500"]);
    let promos = common::csv_file(
        common::PROMO_HEADER,
        &["BIG,fixed,1000,,,0,,true,,"],
    );

    let mut cmd = Command::new(cargo_bin!("course-checkout"));
    cmd.arg("quote")
        .arg(requests.path())
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--promos")
        .arg(promos.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,single,1,500,500,0,C26_1_"));
}

#[test]
fn test_minimum_amount_is_inclusive() {
    let requests = common::csv_file(
        common::REQUEST_HEADER,
        &["1,single,,MIN3000,,,", "2,double,,MIN3000,,,"],
    );
    let catalog = common::csv_file("plan,price", &["single,3000", "double,2999"]);
    let promos = common::csv_file(
        common::PROMO_HEADER,
        &["MIN3000,fixed,100,3000,,0,,true,,"],
    );

    let mut cmd = Command::new(cargo_bin!("course-checkout"));
    cmd.arg("quote")
        .arg(requests.path())
        .arg("--catalog")
        .arg(catalog.path())
        .arg("--promos")
        .arg(promos.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,single,1,3000,100,2900,C26_1_"))
        .stderr(predicate::str::contains("below minimum"));
}

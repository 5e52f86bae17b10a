use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_params::{ArrayFormat, Config, Params};

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Open,
    Closed,
}

#[derive(Debug, Serialize)]
struct Owner {
    id: u32,
    team: Option<String>,
}

#[derive(Debug, Serialize)]
struct Filter {
    status: Vec<Status>,
    owner: Owner,
    #[serde(with = "serde_params::helpers::iso_date_option")]
    updated_since: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct Search {
    q: String,
    filter: Filter,
    cursor: (),
}

fn search() -> Search {
    Search {
        q: "серде & co".to_string(),
        filter: Filter {
            status: vec![Status::Open, Status::Closed],
            owner: Owner { id: 7, team: None },
            updated_since: DateTime::from_timestamp_millis(1_581_061_520_554),
        },
        cursor: (),
    }
}

fn main() {
    let search = search();

    let pairs = serde_params::flatten_object(&search).unwrap();
    println!("Flattened pairs:");
    for (key, value) in &pairs {
        println!("  {key} = {}", value.to_param_string());
    }

    let params = serde_params::http_params(&search).unwrap();
    println!("Query string: {params}");

    let indexed = Config::new()
        .array_format(ArrayFormat::Indexed)
        .params(&search)
        .unwrap();
    println!("Indexed arrays: {indexed}");

    let parsed: Params = params.to_string().parse().unwrap();
    println!("Parsed back `q`: {:?}", parsed.get("q"));
}

#[test]
fn query_string() {
    let params = serde_params::http_params(&search()).unwrap();
    assert_eq!(
        params.to_string(),
        "q=%D1%81%D0%B5%D1%80%D0%B4%D0%B5%20%26%20co&filter.status=open&filter.status=closed&\
         filter.owner.id=7&filter.updated_since=2020-02-07T07%3A45%3A20.554Z&cursor="
    );
}

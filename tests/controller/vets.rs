use insta::assert_json_snapshot;
use petclinic_records::views::vets::VetResponse;
use serde_json::Value;

use crate::{empty_server, seeded_server};

#[tokio::test]
async fn lists_vets_with_sorted_specialties() {
    let server = seeded_server().await;
    let response = server.get("/vets").await;
    response.assert_status_ok();

    let vets: Vec<VetResponse> = response.json();
    assert_eq!(vets.len(), 6);
    assert_eq!(vets[0].nr_of_specialties, 0);
    assert!(vets[0].specialties.is_empty());

    assert_json_snapshot!(vets[2], @r###"
    {
      "id": 3,
      "firstName": "Linda",
      "lastName": "Douglas",
      "specialties": [
        {
          "id": 3,
          "name": "dentistry"
        },
        {
          "id": 2,
          "name": "surgery"
        }
      ],
      "nrOfSpecialties": 2
    }
    "###);
}

#[tokio::test]
async fn empty_directory_is_an_empty_list() {
    let server = empty_server().await;
    let vets: Value = server.get("/vets").await.json();
    assert_eq!(vets, Value::Array(vec![]));
}

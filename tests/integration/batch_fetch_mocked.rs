//! Integration tests for the batched record-fetch phase using mocked HTTP
//!
//! The identifier-search cap bounds only the first phase; the fetch phase
//! partitions whatever came back into fixed-size batches and must keep going
//! when one batch fails.

use affiliation_search::{ClientConfig, PubMedClient, SearchError, SearchFailure};
use tracing_test::traced_test;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    let config = ClientConfig::new().with_base_url(mock_server.uri());
    PubMedClient::with_config(config)
}

fn esearch_body(ids: &[String]) -> String {
    serde_json::json!({
        "esearchresult": {
            "count": ids.len().to_string(),
            "idlist": ids,
        }
    })
    .to_string()
}

fn article_xml(pmid: &str, title: &str) -> String {
    format!(
        r#"<PubmedArticle>
    <MedlineCitation>
        <PMID Version="1">{pmid}</PMID>
        <Article>
            <ArticleTitle>{title}</ArticleTitle>
        </Article>
    </MedlineCitation>
    <PubmedData>
        <ArticleIdList>
            <ArticleId IdType="pubmed">{pmid}</ArticleId>
        </ArticleIdList>
    </PubmedData>
</PubmedArticle>"#
    )
}

fn article_set(articles: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" ?>\n<PubmedArticleSet>\n{}\n</PubmedArticleSet>",
        articles.join("\n")
    )
}

async fn mount_esearch(mock_server: &MockServer, ids: &[String]) {
    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(esearch_body(ids))
                .insert_header("content-type", "application/json"),
        )
        .expect(1)
        .mount(mock_server)
        .await;
}

/// 250 resolved identifiers with the default batch size of 100 must produce
/// exactly three fetch requests (100/100/50); a failure in the middle batch
/// still returns the records from the first and third.
#[tokio::test]
#[traced_test]
async fn test_250_ids_three_batches_middle_failure() {
    let mock_server = MockServer::start().await;

    let ids: Vec<String> = (0..250).map(|i| (10_000_000 + i).to_string()).collect();
    mount_esearch(&mock_server, &ids).await;

    let batch_one = ids[..100].join(",");
    let batch_two = ids[100..200].join(",");
    let batch_three = ids[200..].join(",");

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .and(query_param("id", batch_one.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_set(&[
            article_xml("10000000", "First batch record"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .and(query_param("id", batch_two.as_str()))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .and(query_param("id", batch_three.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_set(&[
            article_xml("10000200", "Third batch record"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let outcome = client
        .search_by_affiliation_with_outcome(&["HC UFPE"], None, None, 250)
        .await;

    // surviving batches, in batch order
    assert_eq!(outcome.articles.len(), 2);
    assert_eq!(outcome.articles[0].external_id, "10000000");
    assert_eq!(outcome.articles[1].external_id, "10000200");

    // the failed batch is reported with exactly the identifiers it dropped
    assert_eq!(outcome.failures.len(), 1);
    match &outcome.failures[0] {
        SearchFailure::FetchBatch {
            batch_index,
            pmids,
            error,
        } => {
            assert_eq!(*batch_index, 1);
            assert_eq!(pmids.len(), 100);
            assert_eq!(pmids[0], "10000100");
            assert!(matches!(error, SearchError::ApiError { status: 500, .. }));
        }
        other => panic!("expected FetchBatch failure, got {other:?}"),
    }

    let received = mock_server.received_requests().await.unwrap();
    let efetch_count = received
        .iter()
        .filter(|r| r.url.path().contains("efetch.fcgi"))
        .count();
    assert_eq!(efetch_count, 3, "expected 100/100/50 batch partition");
}

#[tokio::test]
async fn test_batch_size_override() {
    let mock_server = MockServer::start().await;

    let ids: Vec<String> = (0..5).map(|i| (20_000_000 + i).to_string()).collect();
    mount_esearch(&mock_server, &ids).await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_set(&[
            article_xml("20000000", "Any record"),
        ])))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_batch_size(2);
    let client = PubMedClient::with_config(config);

    let outcome = client
        .search_by_affiliation_with_outcome(&["HC UFPE"], None, None, 5)
        .await;
    assert!(outcome.failures.is_empty());

    let received = mock_server.received_requests().await.unwrap();
    let efetch_count = received
        .iter()
        .filter(|r| r.url.path().contains("efetch.fcgi"))
        .count();
    assert_eq!(efetch_count, 3, "5 ids at batch size 2 -> 2+2+1");
}

#[tokio::test]
async fn test_blank_fetch_body_yields_no_records() {
    let mock_server = MockServer::start().await;

    let ids: Vec<String> = vec!["30000001".to_string(), "30000002".to_string()];
    mount_esearch(&mock_server, &ids).await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   "))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let outcome = client
        .search_by_affiliation_with_outcome(&["HC UFPE"], None, None, 10)
        .await;

    assert!(outcome.articles.is_empty());
    assert!(outcome.failures.is_empty(), "a blank body is not a failure");
}

#[tokio::test]
#[traced_test]
async fn test_unparseable_fetch_document_drops_batch() {
    let mock_server = MockServer::start().await;

    let ids: Vec<String> = vec!["40000001".to_string()];
    mount_esearch(&mock_server, &ids).await;

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<broken>xml</nope>"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let outcome = client
        .search_by_affiliation_with_outcome(&["HC UFPE"], None, None, 10)
        .await;

    assert!(outcome.articles.is_empty());
    assert_eq!(outcome.failures.len(), 1);
    assert!(matches!(
        &outcome.failures[0],
        SearchFailure::FetchBatch {
            error: SearchError::XmlError(_),
            ..
        }
    ));
}

/// A malformed record inside an otherwise valid batch is skipped while its
/// siblings are returned.
#[tokio::test]
async fn test_malformed_record_skipped_within_batch() {
    let mock_server = MockServer::start().await;

    let ids: Vec<String> = vec!["50000001".to_string(), "50000002".to_string()];
    mount_esearch(&mock_server, &ids).await;

    let body = article_set(&[
        // no MedlineCitation/Article envelope: unmappable
        "<PubmedArticle><MedlineCitation><PMID>50000001</PMID></MedlineCitation></PubmedArticle>"
            .to_string(),
        article_xml("50000002", "Intact sibling"),
    ]);

    Mock::given(method("GET"))
        .and(path_regex(r"/efetch\.fcgi.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let outcome = client
        .search_by_affiliation_with_outcome(&["HC UFPE"], None, None, 10)
        .await;

    assert_eq!(outcome.articles.len(), 1);
    assert_eq!(outcome.articles[0].title, "Intact sibling");
    assert!(outcome.failures.is_empty(), "record-level skips are not batch failures");
}

//! Graph adapter against a wiremock server standing in for both the identity
//! platform and Graph.

use std::sync::Arc;

use chrono::NaiveDate;
use mailcal_core::{JobDriver, MailAndCalendarClient};
use mailcal_domain::{
    CalendarEvent, DateRangeFilter, EventDateTime, GraphCredentials, JobConfig, JobTask, JobTasks,
    MailCalError, MailboxAddress, SyntheticEmail,
};
use mailcal_infra::graph::StaticTokenProvider;
use mailcal_infra::{GraphMailClient, HttpClient};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mailbox() -> MailboxAddress {
    MailboxAddress::new("room@x.com").unwrap()
}

fn client(server: &MockServer) -> GraphMailClient {
    let http = HttpClient::builder().max_attempts(1).build().unwrap();
    GraphMailClient::new(http, server.uri(), Arc::new(StaticTokenProvider::new("tok")))
}

#[tokio::test]
async fn send_mail_posts_to_sender_mailbox() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/sender@x.com/sendMail"))
        .and(header("authorization", "Bearer tok"))
        .and(body_partial_json(json!({
            "message": {
                "subject": "ID:45 Graph Function Workshop",
                "from": { "emailAddress": { "address": "sender@x.com" } },
                "toRecipients": [{ "emailAddress": { "address": "room@x.com" } }]
            },
            "saveToSentItems": true
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let sender = MailboxAddress::new("sender@x.com").unwrap();
    let email = SyntheticEmail {
        to: mailbox(),
        from: sender.clone(),
        subject: "ID:45 Graph Function Workshop".into(),
        body: "20180926 07:17\n\r20180926 08:17\n\r".into(),
        identifier: 45,
    };

    client(&server).send_mail(&email, &sender).await.unwrap();
}

#[tokio::test]
async fn inbox_listing_follows_next_link() {
    let server = MockServer::start().await;
    let next_link = format!("{}/users/room@x.com/mailFolders/inbox/messages?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/users/room@x.com/mailFolders/inbox/messages"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "id": "m2", "subject": "Lunch?", "body": { "contentType": "text", "content": "hi" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/room@x.com/mailFolders/inbox/messages"))
        .and(query_param("$top", "50"))
        .and(header("prefer", r#"outlook.body-content-type="text""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": "m1",
                "subject": "ID45: Modern Workplace Conference",
                "sentDateTime": "2018-09-01T12:00:00Z",
                "body": { "contentType": "text", "content": "20180902 09:00\r\n20180902 15:00\r\n" }
            }],
            "@odata.nextLink": next_link
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client(&server).list_inbox_messages(&mailbox()).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, "m1");
    assert!(messages[0].sent_at.is_some());
    assert_eq!(messages[1].subject, "Lunch?");
}

#[tokio::test]
async fn delete_message_targets_the_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/room@x.com/messages/AAMk-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_message("AAMk-1", &mailbox()).await.unwrap();
}

#[tokio::test]
async fn missing_message_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_string("ErrorItemNotFound"))
        .mount(&server)
        .await;

    let err = client(&server).delete_message("gone", &mailbox()).await.unwrap_err();
    assert!(matches!(err, MailCalError::NotFound(msg) if msg.contains("ErrorItemNotFound")));
}

#[tokio::test]
async fn create_event_sends_fixed_zone_and_html_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/room@x.com/calendar/events"))
        .and(body_partial_json(json!({
            "subject": "ID45: Modern Workplace Conference",
            "body": { "contentType": "HTML" },
            "start": { "dateTime": "2018-09-02T09:00:00", "timeZone": "Eastern Standard Time" },
            "end": { "dateTime": "2018-09-02T15:00:00", "timeZone": "Eastern Standard Time" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "e1" })))
        .expect(1)
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2018, 9, 2).unwrap();
    let event = CalendarEvent {
        id: None,
        subject: "ID45: Modern Workplace Conference".into(),
        start: EventDateTime::eastern(day.and_hms_opt(9, 0, 0).unwrap()),
        end: EventDateTime::eastern(day.and_hms_opt(15, 0, 0).unwrap()),
        body_html: "20180902 09:00\r20180902 15:00\r".into(),
    };

    client(&server).create_calendar_event(&event, &mailbox()).await.unwrap();
}

#[tokio::test]
async fn calendar_listing_sends_window_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/room@x.com/calendar/events"))
        .and(query_param(
            "$filter",
            "start/dateTime gt '2018-09-19T00:00' and end/dateTime lt '2018-09-30T00:00'",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {
                    "id": "e1",
                    "subject": "ID:45 Graph Function Workshop",
                    "start": { "dateTime": "2018-09-26T07:00:00.0000000", "timeZone": "Eastern Standard Time" },
                    "end": { "dateTime": "2018-09-26T08:00:00.0000000", "timeZone": "Eastern Standard Time" }
                },
                {
                    "id": "broken",
                    "start": { "dateTime": "soon", "timeZone": "UTC" },
                    "end": { "dateTime": "later", "timeZone": "UTC" }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let now = NaiveDate::from_ymd_opt(2018, 9, 24).unwrap().and_hms_opt(10, 0, 0).unwrap();
    let range = DateRangeFilter::around(now, 5, 6);
    let events = client(&server).list_calendar_events(&mailbox(), &range).await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].subject, "ID:45 Graph Function Workshop");
}

#[tokio::test]
async fn delete_calendar_event_targets_the_event() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/users/room@x.com/calendar/events/e1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_calendar_event("e1", &mailbox()).await.unwrap();
}

#[tokio::test]
async fn configured_client_authenticates_then_processes_inbox() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1.0/users/room@x.com/mailFolders/inbox/messages"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{
                "id": "m1",
                "subject": "ID:12 Workshop",
                "body": { "contentType": "text", "content": "20180902 09:00\r\n20180902 15:00\r\n" }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1.0/users/room@x.com/calendar/events"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1.0/users/room@x.com/messages/m1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let credentials =
        GraphCredentials { app_id: "app".into(), secret: "secret".into(), tenant: "contoso".into() };
    let mut config =
        JobConfig::new(vec![mailbox()], MailboxAddress::new("sender@x.com").unwrap(), credentials);
    config.graph_base_url = format!("{}/v1.0", server.uri());
    config.authority_url = server.uri();
    config.tasks = JobTasks::none().with(JobTask::Process);

    let client = Arc::new(GraphMailClient::from_config(&config).unwrap());
    let driver = JobDriver::from_config(client, &config);
    let now = NaiveDate::from_ymd_opt(2018, 9, 1).unwrap().and_hms_opt(8, 0, 0).unwrap();
    let summary = driver.run(&config.mailboxes, now).await;

    assert_eq!(summary.appointments_created(), 1);
    assert_eq!(summary.messages_removed(), 1);
}

use super::*;

#[test]
fn classifies_unreachable_backend_as_transport_error() {
    let err = UiError::from_message(
        UiErrorContext::Generate,
        "failed to reach generation service: error sending request",
    );
    assert_eq!(err.category(), UiErrorCategory::Transport);
    assert_eq!(err.context(), UiErrorContext::Generate);
}

#[test]
fn classifies_script_rejections_as_validation_errors() {
    let err = UiError::from_message(
        UiErrorContext::Generate,
        "text is 6001 characters long; the limit is 5000",
    );
    assert_eq!(err.category(), UiErrorCategory::Validation);

    let err = UiError::from_message(UiErrorContext::Generate, "invalid generation response: eof");
    assert_eq!(err.category(), UiErrorCategory::Validation);
}

#[test]
fn classifies_generic_status_failures_as_server_errors() {
    let err = UiError::from_message(
        UiErrorContext::Generate,
        "generation request failed with status 502",
    );
    assert_eq!(err.category(), UiErrorCategory::Server);
}

#[test]
fn keeps_backend_message_verbatim() {
    let err = UiError::from_message(UiErrorContext::General, "render farm on fire");
    assert_eq!(err.category(), UiErrorCategory::Unknown);
    assert_eq!(err.message(), "render farm on fire");
}

#[test]
fn classifies_backend_command_processor_disconnect_as_transport_error() {
    let err = UiError::from_message(
        UiErrorContext::General,
        "Backend command processor disconnected (possible startup/runtime failure)",
    );
    assert_eq!(err.category(), UiErrorCategory::Transport);
}

#[test]
fn server_failure_is_classified_by_status_not_wording() {
    let failure = GenerationFailure::new(FailureKind::Status(500), "renderer crashed");
    let err = UiError::from_failure(UiErrorContext::Generate, &failure);
    assert_eq!(err.category(), UiErrorCategory::Server);
    assert_eq!(err.message(), "renderer crashed");

    let failure = GenerationFailure::new(FailureKind::Status(502), "invalid upstream reply");
    let err = UiError::from_failure(UiErrorContext::Generate, &failure);
    assert_eq!(err.category(), UiErrorCategory::Server);
}

#[test]
fn client_status_and_network_failures_map_to_their_categories() {
    let failure = GenerationFailure::new(FailureKind::Status(422), "text must not be empty");
    let err = UiError::from_failure(UiErrorContext::Generate, &failure);
    assert_eq!(err.category(), UiErrorCategory::Validation);

    let failure = GenerationFailure::new(FailureKind::Network, "failed to reach generation service");
    let err = UiError::from_failure(UiErrorContext::Generate, &failure);
    assert_eq!(err.category(), UiErrorCategory::Transport);

    let err = UiError::from_failure(UiErrorContext::Generate, &GenerationFailure::cancelled());
    assert_eq!(err.category(), UiErrorCategory::Unknown);
}

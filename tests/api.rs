mod helpers;

use helpers::setup::{spawn_app, spawn_app_with};
use helpers::utils::{booking_input, days_from_today};
use salon_scheduler_domain::UserRole;
use salon_scheduler_sdk::{
    APIErrorVariant, AppointmentStatus, BookAppointmentInput, GetAvailableSlotsInput,
    GetUserRemindersInput, ReminderStatus, ReminderType, SlotTime, Stylist,
};

#[actix_web::test]
async fn test_status_ok() {
    let (_, sdk) = spawn_app().await;
    let res = sdk.status.check_health().await.expect("To get status");
    assert_eq!(res.timezone, "UTC");
}

#[actix_web::test]
async fn test_book_and_find_by_code() {
    let (_, sdk) = spawn_app().await;
    let mut input = booking_input(3, "2:30 pm", "meera");
    input.service = "facial".into();

    let res = sdk
        .appointment
        .book(input)
        .await
        .expect("To book appointment");
    assert_eq!(res.message, "Appointment booked successfully");
    let booked = res.appointment;
    assert_eq!(booked.status, AppointmentStatus::Pending);
    assert_eq!(booked.email, "asha@example.com");
    assert_eq!(booked.time.to_string(), "02:30 PM");
    assert_eq!(booked.formatted_time, "02:30 PM");
    assert_eq!(booked.service_name, "Facial & Skin Care");
    assert_eq!(booked.service_price, "₹800");
    assert_eq!(booked.service_duration, 90);
    assert_eq!(booked.total_amount, 800);
    assert_eq!(booked.stylist, Stylist::Meera);
    assert_eq!(booked.stylist_name, "Meera Patel");
    assert_eq!(booked.user_id, None);

    let found = sdk
        .appointment
        .get_by_code(&booked.confirmation_code)
        .await
        .expect("To find appointment by code")
        .appointment;
    assert_eq!(found, booked);

    let err = sdk
        .appointment
        .get_by_code("AP00000000ZZZZ")
        .await
        .expect_err("Unknown code");
    assert_eq!(err.variant, APIErrorVariant::NotFound);
}

#[actix_web::test]
async fn test_double_booking_is_a_conflict() {
    let (_, sdk) = spawn_app().await;

    assert!(sdk
        .appointment
        .book(booking_input(4, "11:00 AM", "priya"))
        .await
        .is_ok());
    for stylist in ["priya", "any"] {
        let err = sdk
            .appointment
            .book(booking_input(4, "11:00 AM", stylist))
            .await
            .expect_err("Slot is taken");
        assert_eq!(err.variant, APIErrorVariant::Conflict);
        assert!(err.message.contains("already booked"));
    }
    assert!(sdk
        .appointment
        .book(booking_input(4, "11:00 AM", "anjali"))
        .await
        .is_ok());

    let eleven: SlotTime = "11:00 AM".parse().unwrap();
    let priya = sdk
        .appointment
        .get_available_slots(GetAvailableSlotsInput {
            date: days_from_today(4),
            stylist: Some(Stylist::Priya),
        })
        .await
        .expect("To get slots");
    assert_eq!(priya.booked_slots, vec![eleven]);
    assert!(!priya.available_slots.contains(&eleven));
    assert_eq!(priya.available_slots.len(), 21);

    let kavita = sdk
        .appointment
        .get_available_slots(GetAvailableSlotsInput {
            date: days_from_today(4),
            stylist: Some(Stylist::Kavita),
        })
        .await
        .expect("To get slots");
    assert!(kavita.booked_slots.is_empty());
}

#[actix_web::test]
async fn test_booking_validation() {
    let (_, sdk) = spawn_app().await;

    let cases = vec![
        (
            BookAppointmentInput::default(),
            "Please provide all required fields",
        ),
        (
            BookAppointmentInput {
                email: "not-an-email".into(),
                ..booking_input(2, "10:00 AM", "any")
            },
            "Please provide a valid email address",
        ),
        (
            BookAppointmentInput {
                phone: "12345".into(),
                ..booking_input(2, "10:00 AM", "any")
            },
            "Please provide a valid 10-digit phone number",
        ),
        (
            booking_input(0, "10:00 AM", "any"),
            "Appointment date must be between tomorrow and 30 days from now",
        ),
        (
            booking_input(31, "10:00 AM", "any"),
            "Appointment date must be between tomorrow and 30 days from now",
        ),
        (booking_input(2, "25:00 AM", "any"), "Please select a valid time slot"),
        (booking_input(2, "10:00 AM", "rahul"), "Invalid stylist: rahul"),
    ];

    for (input, message) in cases {
        let err = sdk
            .appointment
            .book(input)
            .await
            .expect_err("Invalid booking");
        assert_eq!(err.variant, APIErrorVariant::BadClientData);
        assert!(err.message.contains(message), "{}", err.message);
    }

    let err = sdk
        .appointment
        .get_available_slots(GetAvailableSlotsInput {
            date: "".into(),
            stylist: None,
        })
        .await
        .expect_err("Date is required");
    assert_eq!(err.variant, APIErrorVariant::BadClientData);
}

#[actix_web::test]
async fn test_customer_flow() {
    let (app, sdk) = spawn_app().await;
    let (user, user_sdk) = app.create_user(UserRole::Customer).await;

    let appointment = user_sdk
        .appointment
        .book(booking_input(3, "10:00 AM", "kavita"))
        .await
        .expect("To book appointment")
        .appointment;
    assert_eq!(appointment.user_id, Some(user.id));
    // Guest booking
    sdk.appointment
        .book(booking_input(3, "11:00 AM", "kavita"))
        .await
        .expect("To book appointment");

    let mine = user_sdk
        .appointment
        .get_mine()
        .await
        .expect("To list appointments")
        .appointments;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, appointment.id);
    let err = sdk.appointment.get_mine().await.expect_err("No token");
    assert_eq!(err.variant, APIErrorVariant::Unauthorized);

    let reminders = user_sdk
        .reminder
        .get_for_appointment(appointment.id)
        .await
        .expect("To get reminders")
        .reminders;
    assert_eq!(reminders.len(), 2);
    assert_eq!(reminders[0].reminder_type, ReminderType::Email);
    assert_eq!(reminders[1].reminder_type, ReminderType::Sms);
    assert!(reminders.iter().all(|r| r.status == ReminderStatus::Pending));

    let cancelled = user_sdk
        .appointment
        .cancel(appointment.id)
        .await
        .expect("To cancel appointment")
        .appointment;
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);

    let reminders = user_sdk
        .reminder
        .get_for_appointment(appointment.id)
        .await
        .expect("To get reminders")
        .reminders;
    assert!(reminders
        .iter()
        .all(|r| r.status == ReminderStatus::Cancelled));

    let err = user_sdk
        .appointment
        .cancel(appointment.id)
        .await
        .expect_err("Already cancelled");
    assert_eq!(err.variant, APIErrorVariant::BadClientData);

    // The slot is free again
    assert!(sdk
        .appointment
        .book(booking_input(3, "10:00 AM", "kavita"))
        .await
        .is_ok());
}

#[actix_web::test]
async fn test_reminders_of_other_users_are_hidden() {
    let (app, _) = spawn_app().await;
    let (_, owner_sdk) = app.create_user(UserRole::Customer).await;
    let (_, other_sdk) = app.create_user(UserRole::Customer).await;

    let appointment = owner_sdk
        .appointment
        .book(booking_input(5, "10:00 AM", "any"))
        .await
        .expect("To book appointment")
        .appointment;

    let err = other_sdk
        .reminder
        .get_for_appointment(appointment.id)
        .await
        .expect_err("Not the owner");
    assert_eq!(err.variant, APIErrorVariant::NotFound);
    let err = other_sdk
        .appointment
        .cancel(appointment.id)
        .await
        .expect_err("Not the owner");
    assert_eq!(err.variant, APIErrorVariant::NotFound);

    let res = owner_sdk
        .reminder
        .cancel_for_appointment(appointment.id)
        .await
        .expect("To cancel reminders");
    assert_eq!(res.cancelled_count, 2);
    let recreated = owner_sdk
        .reminder
        .create_for_appointment(appointment.id)
        .await
        .expect("To create reminders")
        .reminders;
    assert_eq!(recreated.len(), 2);
    let res = owner_sdk
        .reminder
        .cancel_for_appointment(appointment.id)
        .await
        .expect("To cancel reminders");
    assert_eq!(res.cancelled_count, 2);
}

#[actix_web::test]
async fn test_list_user_reminders() {
    let (app, sdk) = spawn_app().await;
    let (user, user_sdk) = app.create_user(UserRole::Customer).await;
    let (_, other_sdk) = app.create_user(UserRole::Customer).await;

    let appointment = user_sdk
        .appointment
        .book(booking_input(4, "02:00 PM", "any"))
        .await
        .expect("To book appointment")
        .appointment;

    let reminders = user_sdk
        .reminder
        .get_mine(GetUserRemindersInput::default())
        .await
        .expect("To list reminders")
        .reminders;
    assert_eq!(reminders.len(), 2);
    assert!(reminders
        .iter()
        .all(|r| r.appointment_id == appointment.id && r.user_id == Some(user.id)));

    let sms = user_sdk
        .reminder
        .get_mine(GetUserRemindersInput {
            status: Some(ReminderStatus::Pending),
            reminder_type: Some(ReminderType::Sms),
        })
        .await
        .expect("To list reminders")
        .reminders;
    assert_eq!(sms.len(), 1);
    assert_eq!(sms[0].reminder_type, ReminderType::Sms);

    let sent = user_sdk
        .reminder
        .get_mine(GetUserRemindersInput {
            status: Some(ReminderStatus::Sent),
            reminder_type: None,
        })
        .await
        .expect("To list reminders")
        .reminders;
    assert!(sent.is_empty());

    let others = other_sdk
        .reminder
        .get_mine(GetUserRemindersInput::default())
        .await
        .expect("To list reminders")
        .reminders;
    assert!(others.is_empty());

    let err = sdk
        .reminder
        .get_mine(GetUserRemindersInput::default())
        .await
        .expect_err("No token");
    assert_eq!(err.variant, APIErrorVariant::Unauthorized);
}

#[actix_web::test]
async fn test_admin_endpoints() {
    let (app, sdk) = spawn_app().await;
    let (_, customer_sdk) = app.create_user(UserRole::Customer).await;
    let (_, admin_sdk) = app.create_user(UserRole::Admin).await;

    let appointment = sdk
        .appointment
        .book(booking_input(6, "05:00 PM", "priya"))
        .await
        .expect("To book appointment")
        .appointment;

    let err = customer_sdk
        .appointment
        .update_status(appointment.id, "confirmed")
        .await
        .expect_err("Customers are not admins");
    assert_eq!(err.variant, APIErrorVariant::Forbidden);
    let err = sdk
        .appointment
        .update_status(appointment.id, "confirmed")
        .await
        .expect_err("No token");
    assert_eq!(err.variant, APIErrorVariant::Unauthorized);

    let updated = admin_sdk
        .appointment
        .update_status(appointment.id, "confirmed")
        .await
        .expect("To update status")
        .appointment;
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
    let err = admin_sdk
        .appointment
        .update_status(appointment.id, "archived")
        .await
        .expect_err("Unknown status");
    assert_eq!(err.variant, APIErrorVariant::BadClientData);

    let err = customer_sdk
        .reminder
        .process_pending()
        .await
        .expect_err("Customers are not admins");
    assert_eq!(err.variant, APIErrorVariant::Forbidden);
    let sweep = admin_sdk
        .reminder
        .process_pending()
        .await
        .expect("To process reminders");
    assert_eq!(sweep.claimed, sweep.sent + sweep.retried + sweep.failed);
}

#[actix_web::test]
async fn test_send_test_reminder_and_resend() {
    let (app, _) = spawn_app_with(|ctx| ctx.config.enable_test_reminders = true).await;
    let (_, user_sdk) = app.create_user(UserRole::Customer).await;

    let appointment = user_sdk
        .appointment
        .book(booking_input(7, "09:00 AM", "any"))
        .await
        .expect("To book appointment")
        .appointment;

    let reminder = user_sdk
        .reminder
        .send_test(appointment.id)
        .await
        .expect("To send test reminder")
        .reminder;
    assert_eq!(reminder.reminder_type, ReminderType::Email);
    assert_eq!(reminder.status, ReminderStatus::Sent);
    assert_eq!(
        reminder.delivery_details.sent_to.as_deref(),
        Some("asha@example.com")
    );

    let err = user_sdk
        .reminder
        .resend(reminder.id)
        .await
        .expect_err("Only failed reminders can be resent");
    assert_eq!(err.variant, APIErrorVariant::BadClientData);
}

#[actix_web::test]
async fn test_send_test_reminder_is_disabled_by_default() {
    let (app, _) = spawn_app_with(|ctx| ctx.config.enable_test_reminders = false).await;
    let (_, user_sdk) = app.create_user(UserRole::Customer).await;

    let appointment = user_sdk
        .appointment
        .book(booking_input(7, "09:00 AM", "any"))
        .await
        .expect("To book appointment")
        .appointment;
    let err = user_sdk
        .reminder
        .send_test(appointment.id)
        .await
        .expect_err("Disabled");
    assert_eq!(err.variant, APIErrorVariant::NotFound);
}

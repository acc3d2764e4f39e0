mod tests {
    use std::thread;

    use myrtio_ble_led::bridge::{
        ATT_ERR_INVALID_ATTR_VALUE_LEN, ATT_ERR_UNLIKELY, ATT_ERR_WRITE_NOT_PERMITTED,
        AttributeError, AttributeId, ControlAttribute, ControlBridge, LED_SERVICE,
        LED_SERVICE_UUID, MAX_PAYLOAD_LEN, Registration, USER_DESCRIPTION_UUID, Uuid,
    };
    use myrtio_ble_led::{ColorChannel, ControlState};

    const SERVICE: u16 = 10;
    const RED: u16 = 12;
    const RED_LABEL: u16 = 13;
    const GREEN: u16 = 15;
    const GREEN_LABEL: u16 = 16;
    const BLUE: u16 = 18;
    const BLUE_LABEL: u16 = 19;
    const DELAY: u16 = 21;
    const DELAY_LABEL: u16 = 22;

    /// Register the LED service the way a GATT server walks its table:
    /// service, then each characteristic followed by its descriptor.
    fn registered(state: &ControlState) -> ControlBridge<'_> {
        let mut bridge = ControlBridge::new(state);
        bridge
            .register(Registration::Service {
                uuid: LED_SERVICE.uuid,
                handle: SERVICE,
            })
            .unwrap();

        let mut handle = SERVICE;
        for characteristic in LED_SERVICE.characteristics {
            // declaration handle, then value, then descriptor
            handle += 2;
            bridge
                .register(Registration::Characteristic {
                    uuid: characteristic.uuid,
                    value_handle: handle,
                })
                .unwrap();
            handle += 1;
            bridge
                .register(Registration::Descriptor {
                    characteristic: characteristic.uuid,
                    uuid: characteristic.description.uuid,
                    handle,
                })
                .unwrap();
        }
        bridge
    }

    #[test]
    fn test_registration_binds_every_attribute() {
        let state = ControlState::new();
        let bridge = registered(&state);

        let red = ControlAttribute::Channel(ColorChannel::Red);
        assert_eq!(bridge.attribute(RED), Some(AttributeId::Value(red)));
        assert_eq!(bridge.attribute(RED_LABEL), Some(AttributeId::Description(red)));
        assert_eq!(
            bridge.attribute(DELAY),
            Some(AttributeId::Value(ControlAttribute::Delay))
        );
        assert_eq!(bridge.handle(AttributeId::Description(ControlAttribute::Delay)), Some(DELAY_LABEL));
        assert_eq!(bridge.attribute(SERVICE), None);
    }

    #[test]
    fn test_color_round_trip() {
        let state = ControlState::new();
        let bridge = registered(&state);

        for handle in [RED, GREEN, BLUE] {
            for value in 0..=255u8 {
                bridge.write_attribute(handle, &[value]).unwrap();
                assert_eq!(bridge.read_attribute(handle).unwrap().as_slice(), &[value]);
            }
        }
    }

    #[test]
    fn test_writes_land_in_state() {
        let state = ControlState::new();
        let bridge = registered(&state);

        bridge.write_attribute(GREEN, &[42]).unwrap();
        bridge.write_attribute(DELAY, &[0x10, 0x27, 0, 0]).unwrap();

        assert_eq!(state.channel(ColorChannel::Green), 42);
        assert_eq!(state.channel(ColorChannel::Red), 0);
        assert_eq!(state.delay_ms(), 10_000);
    }

    #[test]
    fn test_delay_is_little_endian() {
        let state = ControlState::new();
        let bridge = registered(&state);

        assert_eq!(bridge.read_attribute(DELAY).unwrap().as_slice(), &[50, 0, 0, 0]);

        state.set_delay_ms(0x0102_0304);
        assert_eq!(bridge.read_attribute(DELAY).unwrap().as_slice(), &[4, 3, 2, 1]);

        bridge.write_attribute(DELAY, &0u32.to_le_bytes()).unwrap();
        assert_eq!(bridge.read_attribute(DELAY).unwrap().as_slice(), &[0, 0, 0, 0]);
        assert_eq!(state.delay_ms(), 0);

        bridge.write_attribute(DELAY, &u32::MAX.to_le_bytes()).unwrap();
        assert_eq!(state.delay_ms(), u32::MAX);
    }

    #[test]
    fn test_wrong_length_is_rejected_and_state_kept() {
        let state = ControlState::new();
        let bridge = registered(&state);
        bridge.write_attribute(RED, &[7]).unwrap();

        let err = bridge.write_attribute(RED, &[1, 2]).unwrap_err();
        assert_eq!(err, AttributeError::Length { expected: 1, actual: 2 });
        assert_eq!(err.att_error_code(), ATT_ERR_INVALID_ATTR_VALUE_LEN);
        assert_eq!(bridge.read_attribute(RED).unwrap().as_slice(), &[7]);

        assert_eq!(
            bridge.write_attribute(RED, &[]),
            Err(AttributeError::Length { expected: 1, actual: 0 })
        );
        assert_eq!(bridge.read_attribute(RED).unwrap().as_slice(), &[7]);

        for payload in [&[1u8][..], &[1, 2, 3][..], &[1, 2, 3, 4, 5][..]] {
            assert_eq!(
                bridge.write_attribute(DELAY, payload),
                Err(AttributeError::Length {
                    expected: 4,
                    actual: payload.len()
                })
            );
        }
        assert_eq!(state.delay_ms(), 50);
    }

    #[test]
    fn test_repeated_write_is_idempotent() {
        let state = ControlState::new();
        let bridge = registered(&state);

        bridge.write_attribute(BLUE, &[99]).unwrap();
        let once = bridge.read_attribute(BLUE).unwrap();
        bridge.write_attribute(BLUE, &[99]).unwrap();
        assert_eq!(bridge.read_attribute(BLUE).unwrap(), once);

        bridge.write_attribute(DELAY, &[5, 0, 0, 0]).unwrap();
        bridge.write_attribute(DELAY, &[5, 0, 0, 0]).unwrap();
        assert_eq!(bridge.read_attribute(DELAY).unwrap().as_slice(), &[5, 0, 0, 0]);
    }

    #[test]
    fn test_labels_are_constant_and_read_only() {
        let state = ControlState::new();
        let bridge = registered(&state);

        let labels = [
            (RED_LABEL, "RedLedBrightness"),
            (GREEN_LABEL, "GreenLedBrightness"),
            (BLUE_LABEL, "BlueLedBrightness"),
            (DELAY_LABEL, "LedDelayBrightness"),
        ];
        for (handle, label) in labels {
            assert_eq!(bridge.read_attribute(handle).unwrap().as_slice(), label.as_bytes());

            let err = bridge.write_attribute(handle, &[1]).unwrap_err();
            assert_eq!(err, AttributeError::ReadOnly(handle));
            assert_eq!(err.att_error_code(), ATT_ERR_WRITE_NOT_PERMITTED);
        }
        assert_eq!(state.snapshot(), ControlState::new().snapshot());
    }

    #[test]
    fn test_unknown_handle() {
        let state = ControlState::new();
        let bridge = registered(&state);

        let err = bridge.read_attribute(999).unwrap_err();
        assert_eq!(err, AttributeError::UnknownAttribute(999));
        assert_eq!(err.att_error_code(), ATT_ERR_UNLIKELY);
        assert_eq!(
            bridge.write_attribute(SERVICE, &[1]),
            Err(AttributeError::UnknownAttribute(SERVICE))
        );

        let unregistered = ControlBridge::new(&state);
        assert_eq!(
            unregistered.read_attribute(RED),
            Err(AttributeError::UnknownAttribute(RED))
        );
    }

    #[test]
    fn test_unknown_uuid_registration() {
        let state = ControlState::new();
        let mut bridge = ControlBridge::new(&state);
        let stranger = Uuid::Long(0x5c3a659e_897e_45e1_b016_007107c96df6);
        bridge
            .register(Registration::Service {
                uuid: LED_SERVICE_UUID,
                handle: 1,
            })
            .unwrap();

        assert_eq!(
            bridge.register(Registration::Characteristic {
                uuid: stranger,
                value_handle: 2
            }),
            Err(AttributeError::UnknownUuid(stranger))
        );
        // known characteristic, unsupported descriptor
        let red = LED_SERVICE.characteristics[0].uuid;
        assert_eq!(
            bridge.register(Registration::Descriptor {
                characteristic: red,
                uuid: Uuid::Short(0x2902),
                handle: 3
            }),
            Err(AttributeError::UnknownUuid(Uuid::Short(0x2902)))
        );
        assert_eq!(bridge.attribute(2), None);
        assert_eq!(bridge.attribute(3), None);
    }

    #[test]
    fn test_descriptor_of_unknown_characteristic_reports_characteristic() {
        let state = ControlState::new();
        let mut bridge = ControlBridge::new(&state);
        let device_name = Uuid::Short(0x2a00);

        let err = bridge
            .register(Registration::Descriptor {
                characteristic: device_name,
                uuid: USER_DESCRIPTION_UUID,
                handle: 4,
            })
            .unwrap_err();
        assert_eq!(err, AttributeError::UnknownUuid(device_name));
        assert_eq!(bridge.attribute(4), None);
    }

    #[test]
    fn test_foreign_services_are_skipped() {
        let state = ControlState::new();
        let mut bridge = ControlBridge::new(&state);
        let gap = Uuid::Short(0x1800);
        let gatt = Uuid::Short(0x1801);

        // GAP service with device name and appearance
        assert_eq!(bridge.register(Registration::Service { uuid: gap, handle: 1 }), Ok(None));
        assert_eq!(
            bridge.register(Registration::Characteristic {
                uuid: Uuid::Short(0x2a00),
                value_handle: 3
            }),
            Ok(None)
        );
        assert_eq!(
            bridge.register(Registration::Characteristic {
                uuid: Uuid::Short(0x2a01),
                value_handle: 5
            }),
            Ok(None)
        );
        assert_eq!(bridge.register(Registration::Service { uuid: gatt, handle: 6 }), Ok(None));
        assert_eq!(
            bridge.register(Registration::Descriptor {
                characteristic: Uuid::Short(0x2a05),
                uuid: Uuid::Short(0x2902),
                handle: 9
            }),
            Ok(None)
        );
        for handle in [1, 3, 5, 6, 9] {
            assert_eq!(bridge.attribute(handle), None);
        }

        // the LED service after them still binds
        assert_eq!(
            bridge.register(Registration::Service {
                uuid: LED_SERVICE_UUID,
                handle: 10
            }),
            Ok(None)
        );
        let red = LED_SERVICE.characteristics[0];
        assert_eq!(
            bridge.register(Registration::Characteristic {
                uuid: red.uuid,
                value_handle: 12
            }),
            Ok(Some(AttributeId::Value(red.attribute)))
        );
        bridge.write_attribute(12, &[200]).unwrap();
        assert_eq!(state.channel(ColorChannel::Red), 200);
    }

    #[test]
    fn test_rebinding_moves_handle() {
        let state = ControlState::new();
        let mut bridge = ControlBridge::new(&state);
        let red = AttributeId::Value(ControlAttribute::Channel(ColorChannel::Red));
        let green = AttributeId::Value(ControlAttribute::Channel(ColorChannel::Green));

        bridge.bind(1, red);
        bridge.bind(2, red);
        assert_eq!(bridge.attribute(1), None);
        assert_eq!(bridge.attribute(2), Some(red));

        bridge.bind(2, green);
        assert_eq!(bridge.attribute(2), Some(green));
        assert_eq!(bridge.handle(red), None);
    }

    #[test]
    fn test_service_table() {
        assert_eq!(LED_SERVICE.uuid, LED_SERVICE_UUID);
        assert_eq!(LED_SERVICE.characteristics.len(), 4);
        for characteristic in LED_SERVICE.characteristics {
            assert_eq!(characteristic.description.uuid, USER_DESCRIPTION_UUID);
            assert_eq!(characteristic.uuid, characteristic.attribute.uuid());
        }
        assert_eq!(
            LED_SERVICE_UUID.to_string(),
            "41c6b692-0ba0-4b73-b586-35a268a320ef"
        );
        assert_eq!(USER_DESCRIPTION_UUID.to_string(), "0x2901");
    }

    #[test]
    fn test_every_label_fits_one_payload() {
        let state = ControlState::new();
        let bridge = registered(&state);

        for characteristic in LED_SERVICE.characteristics {
            let label = characteristic.description.label;
            assert!(label.len() <= MAX_PAYLOAD_LEN, "{label} does not fit");

            let id = AttributeId::Description(characteristic.attribute);
            let handle = bridge.handle(id).unwrap();
            assert_eq!(bridge.read_attribute(handle).unwrap().as_slice(), label.as_bytes());
            assert_eq!(bridge.read(id).len(), label.len());
        }
    }

    #[test]
    fn test_concurrent_writes_leave_one_value() {
        let state = ControlState::new();
        let bridge = registered(&state);
        let values: Vec<u8> = (1..=16).collect();

        thread::scope(|scope| {
            for &value in &values {
                let bridge = &bridge;
                scope.spawn(move || {
                    for _ in 0..500 {
                        bridge.write_attribute(RED, &[value]).unwrap();
                    }
                });
            }
            let bridge = &bridge;
            let values = &values;
            scope.spawn(move || {
                for _ in 0..2000 {
                    let read = bridge.read_attribute(RED).unwrap();
                    assert_eq!(read.len(), 1);
                    assert!(read[0] == 0 || values.contains(&read[0]));
                }
            });
        });

        let last = bridge.read_attribute(RED).unwrap()[0];
        assert!(values.contains(&last));
        assert_eq!(state.delay_ms(), 50);
    }
}

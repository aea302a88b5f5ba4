//! Both nodes on separate threads, talking over the in-memory link

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use doorlock_core::config::{ConfigStore, Configuration};
use doorlock_core::engine::{Engine, EngineConfig};
use doorlock_core::session::{ClientError, Console, ControlClient, FlowError, Session};
use doorlock_core::traits::Key;
use doorlock_hal::{RamEeprom, UartRx, UartTx};
use doorlock_protocol::Credential;
use doorlock_sim::display::TerminalDisplay;
use doorlock_sim::keypad::{press, ChannelKeypad};
use doorlock_sim::link::{link_pair, SimLink};
use doorlock_sim::peripherals::{LatchMonitor, LatchPosition, SimDelay, SimLatch, SimPot, TerminalBuzzer};
use doorlock_sim::{serve_until_closed, EEPROM_WORDS};

type Storage = RamEeprom<EEPROM_WORDS>;
type HmiSession =
    Session<SimLink, ChannelKeypad, TerminalDisplay<Vec<u8>>, TerminalBuzzer, SimPot, SimDelay>;

struct Rig {
    session: HmiSession,
    keys: Sender<Key>,
    latch: LatchMonitor,
    control: JoinHandle<Storage>,
}

impl Rig {
    fn start(storage: Storage, pot: u16) -> Self {
        let (hmi_link, mut control_link) = link_pair();
        let (latch, monitor) = SimLatch::new(Duration::ZERO);

        let control = thread::spawn(move || {
            let mut engine = Engine::new(ConfigStore::new(storage), latch, EngineConfig::default());
            serve_until_closed(&mut engine, &mut control_link);
            let (store, _) = engine.into_parts();
            store.release()
        });

        let (keypad, keys) = ChannelKeypad::channel();
        let console = Console::new(
            keypad,
            TerminalDisplay::new(Vec::new()),
            TerminalBuzzer::default(),
            SimDelay::compressed(),
        );
        let session = Session::new(ControlClient::new(hmi_link), console, SimPot::Fixed(pot));

        Self {
            session,
            keys,
            latch: monitor,
            control,
        }
    }

    fn press(&self, script: &str) {
        press(&self.keys, script);
    }

    fn client(&mut self) -> &mut ControlClient<SimLink> {
        self.session.client_mut()
    }

    fn screen_log(&self) -> String {
        String::from_utf8_lossy(self.session.console().display().output()).into_owned()
    }

    /// Close the link and collect the Control node's storage
    fn finish(self) -> (Storage, LatchMonitor) {
        let Rig {
            session, control, latch, ..
        } = self;
        drop(session);
        (control.join().expect("control thread panicked"), latch)
    }
}

fn credential(digits: &[u8; 5]) -> Credential {
    Credential::new(*digits).unwrap()
}

fn provisioned_storage(digits: &[u8; 5]) -> Storage {
    let mut store = ConfigStore::new(Storage::new());
    store
        .save(&Configuration::default().with_credential(credential(digits)))
        .unwrap();
    store.release()
}

fn load(storage: Storage) -> Option<Configuration> {
    ConfigStore::new(storage).load().unwrap()
}

#[test]
fn scenario_a_first_boot_provisions() {
    let mut rig = Rig::start(Storage::new(), 0);
    rig.press("12345A 12345A");
    rig.session.boot();

    assert_eq!(rig.client().query_initialized(), Ok(true));
    assert_eq!(rig.session.timeout_seconds(), 10);

    let (storage, _) = rig.finish();
    let config = load(storage).expect("record written");
    assert!(config.initialized);
    assert!(config.accepts(b"12345"));
}

#[test]
fn scenario_b_verify_credential() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    assert_eq!(rig.client().verify(&credential(b"12345")), Ok(()));
    assert_eq!(
        rig.client().verify(&credential(b"00000")),
        Err(ClientError::Rejected)
    );
    rig.finish();
}

#[test]
fn scenario_b_open_door_cycle() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    rig.session.boot();
    rig.press("12345A");
    assert_eq!(rig.session.open_door(), Ok(()));
    assert!(rig.screen_log().contains("Door Open"));

    let (_, latch) = rig.finish();
    let state = latch.state();
    assert_eq!((state.opens, state.closes), (1, 1));
    assert_eq!(state.position, LatchPosition::Locked);
}

#[test]
fn scenario_c_set_timeout() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    assert_eq!(rig.client().set_timeout(&credential(b"12345"), 7), Ok(()));
    assert_eq!(rig.client().get_timeout(), Ok(7));
    assert_eq!(rig.client().set_timeout(&credential(b"12345"), 99), Ok(()));
    assert_eq!(rig.client().get_timeout(), Ok(30));

    let (storage, _) = rig.finish();
    assert_eq!(load(storage).unwrap().timeout_seconds, 30);
}

#[test]
fn scenario_c_set_timeout_from_potentiometer() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 2048);
    rig.press("A 12345A");
    assert_eq!(rig.session.set_timeout(), Ok(17));
    assert_eq!(rig.client().get_timeout(), Ok(17));
    rig.finish();
}

#[test]
fn scenario_d_wrong_credential_keeps_timeout() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    let before = rig.client().get_timeout().unwrap();
    assert_eq!(
        rig.client().set_timeout(&credential(b"54321"), 25),
        Err(ClientError::Rejected)
    );
    assert_eq!(rig.client().get_timeout(), Ok(before));
    rig.finish();
}

#[test]
fn scenario_e_reset() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    rig.client().set_timeout(&credential(b"12345"), 20).unwrap();
    assert_eq!(rig.client().reset(), Ok(()));
    assert_eq!(rig.client().query_initialized(), Ok(false));
    assert_eq!(rig.client().get_timeout(), Ok(10));

    let (storage, latch) = rig.finish();
    assert_eq!(load(storage), None);
    assert_eq!(latch.state().stops, 1);
}

#[test]
fn scenario_e_reset_flow_reprovisions() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    rig.press("12345A 24680A 24680A");
    assert_eq!(rig.session.reset_system(), Ok(()));
    assert!(rig.screen_log().contains("System Reset"));
    assert_eq!(rig.client().verify(&credential(b"24680")), Ok(()));

    let (storage, _) = rig.finish();
    assert!(load(storage).unwrap().accepts(b"24680"));
}

#[test]
fn lockout_after_three_wrong_credentials() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    rig.press("11111A 22222A 33333A");
    assert_eq!(rig.session.open_door(), Err(FlowError::LockedOut));
    assert_eq!(rig.session.attempts().lockouts(), 1);
    assert!(rig.screen_log().contains("LOCKOUT"));

    let (_, latch) = rig.finish();
    assert_eq!(latch.state().opens, 0);
}

#[test]
fn garbage_on_the_line_is_tolerated() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    let link = rig.client().link_mut();
    link.write_blocking(b"zz").unwrap();
    assert_eq!(link.read_byte_timeout(1000), Ok(Some(b'?')));
    assert_eq!(link.read_byte_timeout(1000), Ok(Some(b'?')));
    assert_eq!(rig.client().query_initialized(), Ok(true));
    assert_eq!(rig.client().verify(&credential(b"12345")), Ok(()));
    rig.finish();
}

#[test]
fn change_password_end_to_end() {
    let mut rig = Rig::start(provisioned_storage(b"12345"), 0);
    rig.press("12345A 99999A 99999A");
    assert_eq!(rig.session.change_credential(), Ok(()));
    assert_eq!(
        rig.client().verify(&credential(b"12345")),
        Err(ClientError::Rejected)
    );
    assert_eq!(rig.client().verify(&credential(b"99999")), Ok(()));
    rig.finish();
}

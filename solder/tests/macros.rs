use std::cell::RefCell;
use std::rc::Rc;

use solder::{Container, Injectable, Lifetime};

type SoundLog = Rc<RefCell<Vec<&'static str>>>;

trait Animal {
    fn make_sound(&self);
}

struct Cat {
    log: SoundLog,
}

impl Animal for Cat {
    fn make_sound(&self) {
        self.log.borrow_mut().push("Meow");
    }
}

trait Company {
    fn name(&self) -> &str;
}

struct Acme;

impl Company for Acme {
    fn name(&self) -> &str {
        "Acme"
    }
}

trait Clock {
    fn now(&self) -> u64;
}

struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

#[derive(Injectable)]
struct AnimalService {
    animal: Rc<dyn Animal>,
}

impl AnimalService {
    fn animal(&self) -> &Rc<dyn Animal> {
        &self.animal
    }
}

#[derive(Injectable)]
struct ComplexService {
    company: Rc<dyn Company>,
    clock: Rc<dyn Clock>,
    animal: Rc<dyn Animal>,
}

#[test]
fn animal_service_end_to_end() {
    let log: SoundLog = Rc::new(RefCell::new(Vec::new()));

    let mut container = Container::new();
    container.register_transient_with::<dyn Animal, _>({
        let log = log.clone();
        move |_| Ok(Rc::new(Cat { log: log.clone() }))
    });
    container.register_transient::<AnimalService>();

    let first = container.resolve::<AnimalService>().unwrap();
    let second = container.resolve::<AnimalService>().unwrap();

    assert!(!Rc::ptr_eq(&first, &second));
    assert!(!Rc::ptr_eq(first.animal(), second.animal()));

    first.animal().make_sound();
    second.animal().make_sound();
    assert_eq!(*log.borrow(), vec!["Meow", "Meow"]);
}

#[test]
fn complex_service_mixes_lifetimes() {
    let log: SoundLog = Rc::new(RefCell::new(Vec::new()));

    let mut container = Container::new();
    container.register_singleton_with::<dyn Company, _>(|_| Ok(Rc::new(Acme)));
    container.register_transient_with::<dyn Clock, _>(|_| Ok(Rc::new(SystemClock)));
    container.register_transient_with::<dyn Animal, _>({
        let log = log.clone();
        move |_| Ok(Rc::new(Cat { log: log.clone() }))
    });
    container.register::<ComplexService>(Lifetime::Transient);

    let first = container.resolve::<ComplexService>().unwrap();
    let second = container.resolve::<ComplexService>().unwrap();

    assert!(Rc::ptr_eq(&first.company, &second.company));
    assert!(!Rc::ptr_eq(&first.clock, &second.clock));
    assert!(!Rc::ptr_eq(&first.animal, &second.animal));
    assert_eq!(first.company.name(), "Acme");
    assert!(second.clock.now() > 0);
}

#[derive(Injectable)]
struct Stateless;

#[test]
fn unit_structs_derive() {
    let mut container = Container::new();
    container.register_transient::<Stateless>();

    container.resolve::<Stateless>().unwrap();
}

#[derive(Injectable)]
struct WithDefault {
    company: Rc<dyn Company>,
    #[inject(default)]
    label: String,
}

#[test]
fn default_fields_skip_resolution() {
    let mut container = Container::new();
    container.register_singleton_with::<dyn Company, _>(|_| Ok(Rc::new(Acme)));
    container.register_transient::<WithDefault>();

    let service = container.resolve::<WithDefault>().unwrap();
    assert_eq!(service.company.name(), "Acme");
    assert!(service.label.is_empty());
}

#[derive(Injectable)]
struct PerRequest {
    company: Rc<dyn Company>,
}

#[test]
fn derived_types_work_with_scopes() {
    let mut container = Container::new();
    container.register_singleton_with::<dyn Company, _>(|_| Ok(Rc::new(Acme)));
    container.register_scoped::<PerRequest>();

    let scope = container.create_scope();
    let first = scope.resolve::<PerRequest>().unwrap();
    let second = scope.resolve::<PerRequest>().unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    let other = container.create_scope();
    let third = other.resolve::<PerRequest>().unwrap();
    assert!(!Rc::ptr_eq(&first, &third));
    assert!(Rc::ptr_eq(&first.company, &third.company));
}

#[derive(Injectable)]
struct Layered {
    inner: Rc<AnimalService>,
}

#[test]
fn derived_dependencies_nest() {
    let log: SoundLog = Rc::new(RefCell::new(Vec::new()));

    let mut container = Container::new();
    container.register_transient_with::<dyn Animal, _>({
        let log = log.clone();
        move |_| Ok(Rc::new(Cat { log: log.clone() }))
    });
    container.register_transient::<AnimalService>();
    container.register_singleton::<Layered>();

    let first = container.resolve::<Layered>().unwrap();
    let second = container.resolve::<Layered>().unwrap();
    assert!(Rc::ptr_eq(&first, &second));

    first.inner.animal().make_sound();
    assert_eq!(*log.borrow(), vec!["Meow"]);
}
